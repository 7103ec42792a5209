mod helpers;

use brain::knowledge::index::store_document;
use brain::knowledge::search::{document_count, semantic_search};
use helpers::{similar_embedding, test_db, test_embedding};
use std::path::Path;

#[test]
fn search_ranks_the_closest_document_first() {
    let mut conn = test_db();
    let emb_deploy = test_embedding(3);
    let emb_auth = test_embedding(90);

    store_document(
        &mut conn,
        Path::new("/docs/deploys.md"),
        "How we ship releases",
        &emb_deploy,
    )
    .unwrap();
    store_document(
        &mut conn,
        Path::new("/docs/auth.md"),
        "Session cookies and tokens",
        &emb_auth,
    )
    .unwrap();

    let hits = semantic_search(&conn, &similar_embedding(&emb_deploy), 5).unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].filename, "deploys.md");
    assert!(hits[0].distance < hits[1].distance);
}

#[test]
fn result_limit_is_honored() {
    let mut conn = test_db();
    for seed in 0..8u8 {
        store_document(
            &mut conn,
            Path::new(&format!("/docs/note-{seed}.md")),
            "note body",
            &test_embedding(seed),
        )
        .unwrap();
    }

    let hits = semantic_search(&conn, &test_embedding(2), 3).unwrap();
    assert_eq!(hits.len(), 3);
    assert_eq!(document_count(&conn).unwrap(), 8);
}

#[test]
fn reindexing_a_file_replaces_its_vector() {
    let mut conn = test_db();
    let path = Path::new("/docs/runbook.md");

    store_document(&mut conn, path, "v1 text", &test_embedding(5)).unwrap();
    store_document(&mut conn, path, "v2 text", &test_embedding(50)).unwrap();

    assert_eq!(document_count(&conn).unwrap(), 1);
    let hits = semantic_search(&conn, &test_embedding(50), 1).unwrap();
    assert_eq!(hits[0].content, "v2 text");
    assert!(hits[0].distance < 1e-6);
}

#[test]
fn empty_store_returns_no_hits() {
    let conn = test_db();
    let hits = semantic_search(&conn, &test_embedding(0), 5).unwrap();
    assert!(hits.is_empty());
}
