use std::io::Read;

use noteconn::{Connection, OpenMode, Value};
use tempfile::tempdir;

use super::{child_attrs, root_attrs};
use crate::{NotebookFs, layout};

#[test]
fn test_orphan_node_retrievable() {
    let tmp = tempdir().unwrap();
    let book = tmp.path().join("book");
    let mut conn = NotebookFs::connect(&book).unwrap();
    conn.create_node("root", &root_attrs("root")).unwrap();

    // The parent id does not resolve, so placement falls back to the
    // orphan area keyed by the node's own id.
    let attrs = child_attrs("orphan1", "missing_parent", "Lost");
    conn.create_node("orphan1", &attrs).unwrap();

    assert!(conn.has_node("orphan1"));
    assert_eq!(conn.read_node("orphan1").unwrap(), attrs);
    assert!(
        layout::orphan_dir(&book, "orphan1")
            .join(layout::NODE_META)
            .is_file()
    );
}

#[test]
fn test_second_parentless_node_is_orphaned() {
    let tmp = tempdir().unwrap();
    let book = tmp.path().join("book");
    let mut conn = NotebookFs::connect(&book).unwrap();

    conn.create_node("root", &root_attrs("root")).unwrap();
    conn.create_node("node2", &root_attrs("node2")).unwrap();

    // Only the first parentless node claims the connection root.
    assert_eq!(conn.get_rootid().unwrap(), "root");
    assert!(
        layout::orphan_dir(&book, "node2")
            .join(layout::NODE_META)
            .is_file()
    );
    assert_eq!(conn.read_node("node2").unwrap(), root_attrs("node2"));
}

#[test]
fn test_sibling_title_collision() {
    let tmp = tempdir().unwrap();
    let book = tmp.path().join("book");
    let mut conn = NotebookFs::connect(&book).unwrap();
    conn.create_node("root", &root_attrs("root")).unwrap();

    conn.create_node("c1", &child_attrs("c1", "root", "Same Title"))
        .unwrap();
    conn.create_node("c2", &child_attrs("c2", "root", "Same Title"))
        .unwrap();

    assert!(book.join("same title/node.json").is_file());
    assert!(book.join("same title-2/node.json").is_file());

    // Both remain addressable by id.
    assert_eq!(
        conn.read_node("c1").unwrap()["nodeid"],
        Value::from("c1")
    );
    assert_eq!(
        conn.read_node("c2").unwrap()["nodeid"],
        Value::from("c2")
    );
}

#[test]
fn test_blank_page_materialized() {
    let tmp = tempdir().unwrap();
    let mut conn = NotebookFs::connect(tmp.path().join("book")).unwrap();
    conn.create_node("root", &root_attrs("root")).unwrap();

    let mut attrs = child_attrs("page1", "root", "My Page");
    attrs.insert(
        "content_type".into(),
        Value::from(layout::PAGE_CONTENT_TYPE),
    );
    conn.create_node("page1", &attrs).unwrap();

    // The page body is readable before the caller ever wrote one.
    let mut text = String::new();
    conn.open_file("page1", layout::PAGE_FILE, OpenMode::Read)
        .unwrap()
        .read_to_string(&mut text)
        .unwrap();
    assert_eq!(text, layout::BLANK_PAGE);
}

#[test]
fn test_reconnect_recovers_tree() {
    let tmp = tempdir().unwrap();
    let book = tmp.path().join("book");
    {
        let mut conn = NotebookFs::connect(&book).unwrap();
        conn.create_node("root", &root_attrs("root")).unwrap();
        conn.create_node("child1", &child_attrs("child1", "root", "Alpha"))
            .unwrap();
        conn.create_node("orphan1", &child_attrs("orphan1", "gone", "Lost"))
            .unwrap();
    }

    // A fresh connection recovers the root claim from the root record
    // and finds everything else lazily.
    let mut conn = NotebookFs::connect(&book).unwrap();
    assert_eq!(conn.get_rootid().unwrap(), "root");
    assert!(conn.has_node("child1"));
    assert_eq!(
        conn.read_node("child1").unwrap()["title"],
        Value::from("Alpha")
    );
    assert!(conn.has_node("orphan1"));
    assert!(!conn.has_node("nope"));
}

#[test]
fn test_deleting_parent_dir_drops_child_placement() {
    let tmp = tempdir().unwrap();
    let book = tmp.path().join("book");
    let mut conn = NotebookFs::connect(&book).unwrap();
    conn.create_node("root", &root_attrs("root")).unwrap();
    conn.create_node("child1", &child_attrs("child1", "root", "Alpha"))
        .unwrap();
    assert!(conn.has_node("child1"));

    // The child's directory is also reachable as a directory in the
    // root node's file namespace; removing it takes the node with it.
    conn.delete_file("root", "alpha/").unwrap();
    assert!(!conn.has_node("child1"));
}
