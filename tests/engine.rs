//! Resolver behavior through the public API, using small synthetic assets.

use std::cell::Cell;
use std::rc::Rc;

use clusterforge::domain::entities::{Content, State};
use clusterforge::domain::ports::{Asset, Generated, Parents};
use clusterforge::domain::value_objects::{AssetId, OnDiskFiles};
use clusterforge::{AssetError, AssetGraph, AssetResult, Origin, Resolver};
use tempfile::tempdir;

/// Writes `<name>.txt` holding its name plus every parent's text
struct Node {
    name: String,
    deps: Vec<AssetId>,
    calls: Rc<Cell<usize>>,
}

impl Node {
    fn new(name: &str, deps: Vec<AssetId>) -> (Self, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        let node = Self {
            name: name.to_string(),
            deps,
            calls: calls.clone(),
        };
        (node, calls)
    }

    fn file(&self) -> String {
        format!("{}.txt", self.name)
    }
}

impl Asset for Node {
    fn name(&self) -> &str {
        &self.name
    }

    fn dependencies(&self) -> Vec<AssetId> {
        self.deps.clone()
    }

    fn generate(&self, parents: &Parents, _on_disk: &OnDiskFiles) -> AssetResult<Generated> {
        self.calls.set(self.calls.get() + 1);
        let mut text = self.name.clone();
        for dep in &self.deps {
            text.push('+');
            text.push_str(&parents.first_text(*dep)?);
        }
        Ok(Generated::State(
            State::new().with_content(Content::new(self.file(), text)),
        ))
    }

    fn load(&self, on_disk: &OnDiskFiles) -> AssetResult<Option<State>> {
        Ok(on_disk.load_exact(&[&self.file()]))
    }
}

#[test]
fn diamond_generates_shared_dependency_once() {
    let mut graph = AssetGraph::new();
    let (d, d_calls) = Node::new("d", vec![]);
    let d = graph.add(d);
    let (b, _) = Node::new("b", vec![d]);
    let b = graph.add(b);
    let (c, _) = Node::new("c", vec![d]);
    let c = graph.add(c);
    let (a, _) = Node::new("a", vec![b, c]);
    let a = graph.add(a);

    let on_disk = OnDiskFiles::new();
    let mut resolver = Resolver::new(&graph, &on_disk);
    let root = resolver.resolve(a).unwrap();

    assert_eq!(d_calls.get(), 1);
    assert_eq!(
        root.state.unwrap().contents()[0].data,
        b"a+b+d+c+d".to_vec()
    );

    let order: Vec<_> = resolver
        .report()
        .entries
        .iter()
        .map(|e| e.name.clone())
        .collect();
    assert_eq!(order, vec!["d", "b", "c", "a"]);
}

#[test]
fn persisted_output_short_circuits_the_next_run() {
    let dir = tempdir().unwrap();
    let mut graph = AssetGraph::new();
    let (leaf, leaf_calls) = Node::new("leaf", vec![]);
    let leaf = graph.add(leaf);
    let (top, top_calls) = Node::new("top", vec![leaf]);
    let top = graph.add(top);

    let empty = OnDiskFiles::new();
    Resolver::new(&graph, &empty)
        .persist_to(dir.path())
        .resolve(top)
        .unwrap();
    assert_eq!((leaf_calls.get(), top_calls.get()), (1, 1));

    let snapshot = clusterforge::infrastructure::load_on_disk_files(dir.path()).unwrap();
    let mut resolver = Resolver::new(&graph, &snapshot).persist_to(dir.path());
    let resolved = resolver.resolve(top).unwrap();

    assert_eq!((leaf_calls.get(), top_calls.get()), (1, 1));
    assert_eq!(resolved.origin, Origin::OnDisk);
    assert_eq!(
        resolved.state.unwrap().contents()[0].data,
        b"top+leaf".to_vec()
    );
}

/// Depends on whatever handle is filled in after construction
struct Forward {
    name: &'static str,
    target: Rc<Cell<Option<AssetId>>>,
}

impl Asset for Forward {
    fn name(&self) -> &str {
        self.name
    }

    fn dependencies(&self) -> Vec<AssetId> {
        self.target.get().into_iter().collect()
    }

    fn generate(&self, _parents: &Parents, _on_disk: &OnDiskFiles) -> AssetResult<Generated> {
        Ok(Generated::Skipped)
    }
}

#[test]
fn three_node_cycle_is_reported() {
    let mut graph = AssetGraph::new();
    let a_to_b = Rc::new(Cell::new(None));
    let a_id = graph.add(Forward {
        name: "a",
        target: a_to_b.clone(),
    });
    let (c, _) = Node::new("c", vec![a_id]);
    let c_id = graph.add(c);
    let (b, _) = Node::new("b", vec![c_id]);
    let b_id = graph.add(b);
    a_to_b.set(Some(b_id));

    let on_disk = OnDiskFiles::new();
    let err = Resolver::new(&graph, &on_disk).resolve(a_id).unwrap_err();

    assert!(matches!(err.innermost(), AssetError::Cycle { asset } if asset == "a"));
    assert_eq!(err.asset_path(), vec!["a", "b", "c", "a"]);
}
