//! The core `Graph<N, E, G>` container.
//!
//! Nodes and edges are keyed by string identifier (multi-edges distinguished by an optional
//! `name`). Internally every node and edge also has a dense array index; the `_ix` family of
//! accessors and `for_each_*_ix` callbacks exist so hot algorithmic loops can avoid hashing
//! strings on every step while still reading/writing through the label types callers expect.
//!
//! `directed: false` graphs store each edge once but present it symmetrically: `successors`,
//! `predecessors`, `out_edges` and `in_edges` all see both endpoints as neighbours of one
//! another, matching `@dagrejs/graphlib`'s undirected mode.
//!
//! Node/edge removal leave holes (`None` slots) rather than shifting indices, so a `_ix`
//! obtained before a removal may become stale; removal bumps the adjacency cache generation.

use super::adj_cache::{DirectedAdjCache, UndirectedAdjCache};
use super::edge_key::{EdgeKey, EdgeKeyView};
use super::entries::{EdgeEntry, NodeEntry};
use super::options::GraphOptions;

use hashbrown::HashMap as HbHashMap;
use rustc_hash::FxHashMap as HashMap;

#[derive(Debug, Clone)]
pub struct Graph<N, E, G> {
    options: GraphOptions,
    graph_label: G,

    nodes: Vec<Option<NodeEntry<N>>>,
    node_ix_by_id: HashMap<String, usize>,

    edges: Vec<Option<EdgeEntry<E>>>,
    edge_ix_by_key: HbHashMap<EdgeKey, usize>,

    // Compound-graph tree: only meaningful when `options.compound` is set.
    parent_by_ix: Vec<Option<usize>>,
    children_by_ix: Vec<Vec<usize>>,

    node_count: usize,
    edge_count: usize,

    directed_cache: Option<DirectedAdjCache>,
    undirected_cache: Option<UndirectedAdjCache>,
    generation: u64,

    default_node_label: Option<N>,
    default_edge_label: Option<E>,
}

impl<N, E, G: Default> Graph<N, E, G> {
    pub fn new(options: GraphOptions) -> Self {
        Self {
            options,
            graph_label: G::default(),
            nodes: Vec::new(),
            node_ix_by_id: HashMap::default(),
            edges: Vec::new(),
            edge_ix_by_key: HbHashMap::new(),
            parent_by_ix: Vec::new(),
            children_by_ix: Vec::new(),
            node_count: 0,
            edge_count: 0,
            directed_cache: None,
            undirected_cache: None,
            generation: 0,
            default_node_label: None,
            default_edge_label: None,
        }
    }
}

impl<N, E, G> Graph<N, E, G> {
    pub fn options(&self) -> GraphOptions {
        self.options
    }

    pub fn is_directed(&self) -> bool {
        self.options.directed
    }

    pub fn graph(&self) -> &G {
        &self.graph_label
    }

    pub fn graph_mut(&mut self) -> &mut G {
        &mut self.graph_label
    }

    pub fn set_graph(&mut self, label: G) {
        self.graph_label = label;
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    fn bump_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.directed_cache = None;
        self.undirected_cache = None;
    }

    pub fn node_ix(&self, id: &str) -> Option<usize> {
        self.node_ix_by_id.get(id).copied()
    }

    pub fn node_id_by_ix(&self, ix: usize) -> Option<&str> {
        self.nodes.get(ix)?.as_ref().map(|e| e.id.as_str())
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.node_ix(id).is_some()
    }

    pub fn node(&self, id: &str) -> Option<&N> {
        let ix = self.node_ix(id)?;
        self.nodes[ix].as_ref().map(|e| &e.label)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut N> {
        let ix = self.node_ix_by_id.get(id).copied()?;
        self.nodes[ix].as_mut().map(|e| &mut e.label)
    }

    pub fn node_label_by_ix(&self, ix: usize) -> Option<&N> {
        self.nodes.get(ix)?.as_ref().map(|e| &e.label)
    }

    pub fn node_label_mut_by_ix(&mut self, ix: usize) -> Option<&mut N> {
        self.nodes.get_mut(ix)?.as_mut().map(|e| &mut e.label)
    }

    pub fn set_default_node_label(&mut self, label: N)
    where
        N: Clone,
    {
        self.default_node_label = Some(label);
    }

    pub fn set_default_edge_label(&mut self, label: E)
    where
        E: Clone,
    {
        self.default_edge_label = Some(label);
    }

    /// Inserts or overwrites `id`'s label; returns its index.
    pub fn set_node(&mut self, id: impl Into<String>, label: N) -> usize {
        let id = id.into();
        if let Some(&ix) = self.node_ix_by_id.get(&id) {
            self.nodes[ix] = Some(NodeEntry { id, label });
            return ix;
        }
        let ix = self.nodes.len();
        self.nodes.push(Some(NodeEntry {
            id: id.clone(),
            label,
        }));
        self.node_ix_by_id.insert(id, ix);
        self.parent_by_ix.push(None);
        self.children_by_ix.push(Vec::new());
        self.node_count += 1;
        self.bump_generation();
        ix
    }

    /// Inserts `id` with the default node label if absent; returns its index either way.
    pub fn ensure_node(&mut self, id: impl Into<String>) -> usize
    where
        N: Clone + Default,
    {
        let id = id.into();
        if let Some(&ix) = self.node_ix_by_id.get(&id) {
            return ix;
        }
        let label = self.default_node_label.clone().unwrap_or_default();
        self.set_node(id, label)
    }

    pub fn remove_node(&mut self, id: &str) {
        let Some(ix) = self.node_ix_by_id.remove(id) else {
            return;
        };
        self.nodes[ix] = None;
        self.node_count -= 1;

        if let Some(parent) = self.parent_by_ix[ix].take() {
            self.children_by_ix[parent].retain(|&c| c != ix);
        }
        for child in std::mem::take(&mut self.children_by_ix[ix]) {
            self.parent_by_ix[child] = None;
        }

        let doomed: Vec<EdgeKey> = self
            .edges
            .iter()
            .flatten()
            .filter(|e| e.v_ix == ix || e.w_ix == ix)
            .map(|e| e.key.clone())
            .collect();
        for key in doomed {
            self.remove_edge_key(&key.v, &key.w, key.name.as_deref());
        }
        self.bump_generation();
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().flatten().map(|e| e.id.as_str())
    }

    pub fn node_ids(&self) -> Vec<String> {
        self.nodes().map(|s| s.to_string()).collect()
    }

    pub fn for_each_node(&self, mut f: impl FnMut(&str, &N)) {
        for entry in self.nodes.iter().flatten() {
            f(&entry.id, &entry.label);
        }
    }

    pub fn for_each_node_mut(&mut self, mut f: impl FnMut(&str, &mut N)) {
        for entry in self.nodes.iter_mut().flatten() {
            f(&entry.id, &mut entry.label);
        }
    }

    pub fn for_each_node_ix(&self, mut f: impl FnMut(usize, &str, &N)) {
        for (ix, entry) in self.nodes.iter().enumerate() {
            if let Some(entry) = entry {
                f(ix, &entry.id, &entry.label);
            }
        }
    }

    // ---- edges ----

    fn edge_key_view<'a>(v: &'a str, w: &'a str, name: Option<&'a str>) -> EdgeKeyView<'a> {
        EdgeKeyView { v, w, name }
    }

    /// Canonical (v, w) storage order for an undirected edge: sorted so `has_edge`/`edge`
    /// find it regardless of which endpoint the caller names first.
    fn canonical<'a>(&self, v: &'a str, w: &'a str) -> (&'a str, &'a str) {
        if self.options.directed || v <= w { (v, w) } else { (w, v) }
    }

    pub fn has_edge(&self, v: &str, w: &str, name: Option<&str>) -> bool {
        let (v, w) = self.canonical(v, w);
        self.edge_ix_by_key
            .get(&Self::edge_key_view(v, w, name))
            .is_some()
    }

    pub fn has_edge_ix(&self, v_ix: usize, w_ix: usize) -> bool {
        self.edges.iter().flatten().any(|e| {
            (e.v_ix == v_ix && e.w_ix == w_ix)
                || (!self.options.directed && e.v_ix == w_ix && e.w_ix == v_ix)
        })
    }

    pub fn edge(&self, v: &str, w: &str, name: Option<&str>) -> Option<&E> {
        let (v, w) = self.canonical(v, w);
        let &ix = self.edge_ix_by_key.get(&Self::edge_key_view(v, w, name))?;
        self.edges[ix].as_ref().map(|e| &e.label)
    }

    pub fn edge_by_key(&self, key: &EdgeKey) -> Option<&E> {
        self.edge(&key.v, &key.w, key.name.as_deref())
    }

    pub fn edge_mut(&mut self, v: &str, w: &str, name: Option<&str>) -> Option<&mut E> {
        let (v, w) = self.canonical(v, w);
        let &ix = self.edge_ix_by_key.get(&Self::edge_key_view(v, w, name))?;
        self.edges[ix].as_mut().map(|e| &mut e.label)
    }

    pub fn edge_mut_by_key(&mut self, key: &EdgeKey) -> Option<&mut E> {
        self.edge_mut(&key.v, &key.w, key.name.as_deref())
    }

    pub fn edge_by_endpoints_ix(&self, v_ix: usize, w_ix: usize) -> Option<&E> {
        self.edges
            .iter()
            .flatten()
            .find(|e| e.v_ix == v_ix && e.w_ix == w_ix)
            .map(|e| &e.label)
    }

    pub fn edge_key_by_ix(&self, ix: usize) -> Option<&EdgeKey> {
        self.edges.get(ix)?.as_ref().map(|e| &e.key)
    }

    /// Sets the unnamed edge `(v, w)` to the default edge label, inserting missing endpoints.
    pub fn set_edge(&mut self, v: impl Into<String>, w: impl Into<String>) -> usize
    where
        N: Clone + Default,
        E: Clone + Default,
    {
        let label = self.default_edge_label.clone().unwrap_or_default();
        self.set_edge_named(v, w, None::<String>, label)
    }

    pub fn set_edge_with_label(&mut self, v: impl Into<String>, w: impl Into<String>, label: E) -> usize
    where
        N: Clone + Default,
    {
        self.set_edge_named(v, w, None::<String>, label)
    }

    pub fn set_edge_key(&mut self, key: &EdgeKey, label: E) -> usize
    where
        N: Clone + Default,
    {
        self.set_edge_named(key.v.clone(), key.w.clone(), key.name.clone(), label)
    }

    pub fn set_edge_named(
        &mut self,
        v: impl Into<String>,
        w: impl Into<String>,
        name: Option<impl Into<String>>,
        label: E,
    ) -> usize
    where
        N: Clone + Default,
    {
        let v = v.into();
        let w = w.into();
        let name = name.map(Into::into);
        let (v, w) = if self.options.directed || v <= w {
            (v, w)
        } else {
            (w, v)
        };

        if let Some(&ix) = self
            .edge_ix_by_key
            .get(&Self::edge_key_view(&v, &w, name.as_deref()))
        {
            self.edges[ix].as_mut().unwrap().label = label;
            return ix;
        }

        let v_ix = self.ensure_node(v.clone());
        let w_ix = self.ensure_node(w.clone());
        let key = EdgeKey::new(v, w, name);
        let ix = self.edges.len();
        self.edges.push(Some(EdgeEntry {
            key: key.clone(),
            v_ix,
            w_ix,
            label,
        }));
        self.edge_ix_by_key.insert(key, ix);
        self.edge_count += 1;
        self.bump_generation();
        ix
    }

    pub fn remove_edge(&mut self, v: &str, w: &str) {
        self.remove_edge_key(v, w, None);
    }

    pub fn remove_edge_key(&mut self, v: &str, w: &str, name: Option<&str>) {
        let (v, w) = self.canonical(v, w);
        let Some(ix) = self.edge_ix_by_key.remove(&Self::edge_key_view(v, w, name)) else {
            return;
        };
        self.edges[ix] = None;
        self.edge_count -= 1;
        self.bump_generation();
    }

    pub fn edges(&self) -> impl Iterator<Item = &EdgeKey> {
        self.edges.iter().flatten().map(|e| &e.key)
    }

    pub fn edge_keys(&self) -> Vec<EdgeKey> {
        self.edges().cloned().collect()
    }

    pub fn for_each_edge(&self, mut f: impl FnMut(&EdgeKey, &E)) {
        for entry in self.edges.iter().flatten() {
            f(&entry.key, &entry.label);
        }
    }

    pub fn for_each_edge_mut(&mut self, mut f: impl FnMut(&EdgeKey, &mut E)) {
        for entry in self.edges.iter_mut().flatten() {
            f(&entry.key, &mut entry.label);
        }
    }

    pub fn for_each_edge_ix(&self, mut f: impl FnMut(usize, usize, &EdgeKey, &E)) {
        for entry in self.edges.iter().flatten() {
            f(entry.v_ix, entry.w_ix, &entry.key, &entry.label);
        }
    }

    pub fn for_each_edge_entry_ix(&self, mut f: impl FnMut(usize, usize, usize, &EdgeKey, &E)) {
        for (ix, entry) in self.edges.iter().enumerate() {
            if let Some(entry) = entry {
                f(ix, entry.v_ix, entry.w_ix, &entry.key, &entry.label);
            }
        }
    }

    // ---- adjacency (by string id; walks edges directly, no cache) ----

    /// Out-edges of `v`, optionally filtered to those also touching `other`.
    pub fn out_edges(&self, v: &str, other: Option<&str>) -> Vec<EdgeKey> {
        let Some(v_ix) = self.node_ix(v) else {
            return Vec::new();
        };
        let other_ix = match other {
            Some(o) => match self.node_ix(o) {
                Some(ix) => Some(ix),
                None => return Vec::new(),
            },
            None => None,
        };
        self.edges
            .iter()
            .flatten()
            .filter(|e| {
                let touches = e.v_ix == v_ix || (!self.options.directed && e.w_ix == v_ix);
                touches
                    && other_ix.is_none_or(|o| {
                        (e.v_ix == v_ix && e.w_ix == o) || (e.w_ix == v_ix && e.v_ix == o)
                    })
            })
            .map(|e| e.key.clone())
            .collect()
    }

    /// In-edges of `v`, optionally filtered to those also touching `other`.
    pub fn in_edges(&self, v: &str, other: Option<&str>) -> Vec<EdgeKey> {
        let Some(v_ix) = self.node_ix(v) else {
            return Vec::new();
        };
        let other_ix = match other {
            Some(o) => match self.node_ix(o) {
                Some(ix) => Some(ix),
                None => return Vec::new(),
            },
            None => None,
        };
        self.edges
            .iter()
            .flatten()
            .filter(|e| {
                let touches = e.w_ix == v_ix || (!self.options.directed && e.v_ix == v_ix);
                touches
                    && other_ix.is_none_or(|o| {
                        (e.w_ix == v_ix && e.v_ix == o) || (e.v_ix == v_ix && e.w_ix == o)
                    })
            })
            .map(|e| e.key.clone())
            .collect()
    }

    /// All edges incident on `v`, regardless of direction.
    pub fn node_edges(&self, v: &str) -> Vec<EdgeKey> {
        let Some(v_ix) = self.node_ix(v) else {
            return Vec::new();
        };
        self.edges
            .iter()
            .flatten()
            .filter(|e| e.v_ix == v_ix || e.w_ix == v_ix)
            .map(|e| e.key.clone())
            .collect()
    }

    pub fn successors(&self, v: &str) -> Vec<&str> {
        let Some(v_ix) = self.node_ix(v) else {
            return Vec::new();
        };
        self.edges
            .iter()
            .flatten()
            .filter_map(|e| {
                if e.v_ix == v_ix {
                    self.node_id_by_ix(e.w_ix)
                } else if !self.options.directed && e.w_ix == v_ix {
                    self.node_id_by_ix(e.v_ix)
                } else {
                    None
                }
            })
            .collect()
    }

    pub fn predecessors(&self, v: &str) -> Vec<&str> {
        let Some(v_ix) = self.node_ix(v) else {
            return Vec::new();
        };
        self.edges
            .iter()
            .flatten()
            .filter_map(|e| {
                if e.w_ix == v_ix {
                    self.node_id_by_ix(e.v_ix)
                } else if !self.options.directed && e.v_ix == v_ix {
                    self.node_id_by_ix(e.w_ix)
                } else {
                    None
                }
            })
            .collect()
    }

    pub fn neighbors(&self, v: &str) -> Vec<&str> {
        let mut out: Vec<&str> = self.successors(v);
        out.extend(self.predecessors(v));
        out.sort_unstable();
        out.dedup();
        out
    }

    pub fn extend_successors(&self, v: &str, out: &mut Vec<String>) {
        out.extend(self.successors(v).into_iter().map(|s| s.to_string()));
    }

    pub fn extend_predecessors(&self, v: &str, out: &mut Vec<String>) {
        out.extend(self.predecessors(v).into_iter().map(|s| s.to_string()));
    }

    pub fn first_successor(&self, v: &str) -> Option<&str> {
        self.successors(v).into_iter().next()
    }

    pub fn first_predecessor(&self, v: &str) -> Option<&str> {
        self.predecessors(v).into_iter().next()
    }

    pub fn sources(&self) -> Vec<&str> {
        self.nodes()
            .filter(|v| self.predecessors(v).is_empty())
            .collect()
    }

    pub fn for_each_out_edge(&self, v: &str, other: Option<&str>, mut f: impl FnMut(&EdgeKey, &E)) {
        for key in self.out_edges(v, other) {
            if let Some(lbl) = self.edge_by_key(&key) {
                f(&key, lbl);
            }
        }
    }

    pub fn for_each_in_edge(&self, v: &str, other: Option<&str>, mut f: impl FnMut(&EdgeKey, &E)) {
        for key in self.in_edges(v, other) {
            if let Some(lbl) = self.edge_by_key(&key) {
                f(&key, lbl);
            }
        }
    }

    pub fn for_each_predecessor(&self, v: &str, mut f: impl FnMut(&str)) {
        for u in self.predecessors(v) {
            f(u);
        }
    }

    pub fn for_each_successor(&self, v: &str, mut f: impl FnMut(&str)) {
        for w in self.successors(v) {
            f(w);
        }
    }

    // ---- indexed adjacency (cached, CSR) ----

    fn ensure_directed_cache(&mut self) {
        if self.directed_cache.is_some() {
            return;
        }
        let n = self.nodes.len();
        let mut out_count = vec![0usize; n];
        let mut in_count = vec![0usize; n];
        for entry in self.edges.iter().flatten() {
            out_count[entry.v_ix] += 1;
            in_count[entry.w_ix] += 1;
            if !self.options.directed && entry.v_ix != entry.w_ix {
                out_count[entry.w_ix] += 1;
                in_count[entry.v_ix] += 1;
            }
        }
        let mut out_offsets = vec![0usize; n + 1];
        let mut in_offsets = vec![0usize; n + 1];
        for i in 0..n {
            out_offsets[i + 1] = out_offsets[i] + out_count[i];
            in_offsets[i + 1] = in_offsets[i] + in_count[i];
        }
        let mut out_edges = vec![0usize; out_offsets[n]];
        let mut in_edges = vec![0usize; in_offsets[n]];
        let mut out_cursor = out_offsets.clone();
        let mut in_cursor = in_offsets.clone();
        for (ix, entry) in self.edges.iter().enumerate() {
            let Some(entry) = entry else { continue };
            out_edges[out_cursor[entry.v_ix]] = ix;
            out_cursor[entry.v_ix] += 1;
            in_edges[in_cursor[entry.w_ix]] = ix;
            in_cursor[entry.w_ix] += 1;
            if !self.options.directed && entry.v_ix != entry.w_ix {
                out_edges[out_cursor[entry.w_ix]] = ix;
                out_cursor[entry.w_ix] += 1;
                in_edges[in_cursor[entry.v_ix]] = ix;
                in_cursor[entry.v_ix] += 1;
            }
        }
        self.directed_cache = Some(DirectedAdjCache {
            generation: self.generation,
            out_offsets,
            out_edges,
            in_offsets,
            in_edges,
        });
    }

    pub fn for_each_out_edge_ix(
        &mut self,
        v_ix: usize,
        other_ix: Option<usize>,
        mut f: impl FnMut(usize, usize, &EdgeKey, &E),
    ) {
        self.ensure_directed_cache();
        let cache = self.directed_cache.as_ref().unwrap();
        for &eix in cache.out_edges(v_ix) {
            if let Some(entry) = &self.edges[eix] {
                let (tail, head) = if entry.v_ix == v_ix {
                    (entry.v_ix, entry.w_ix)
                } else {
                    (entry.w_ix, entry.v_ix)
                };
                if other_ix.is_none_or(|o| head == o) {
                    f(tail, head, &entry.key, &entry.label);
                }
            }
        }
    }

    pub fn for_each_in_edge_ix(
        &mut self,
        v_ix: usize,
        other_ix: Option<usize>,
        mut f: impl FnMut(usize, usize, &EdgeKey, &E),
    ) {
        self.ensure_directed_cache();
        let cache = self.directed_cache.as_ref().unwrap();
        for &eix in cache.in_edges(v_ix) {
            if let Some(entry) = &self.edges[eix] {
                let (tail, head) = if entry.w_ix == v_ix {
                    (entry.v_ix, entry.w_ix)
                } else {
                    (entry.w_ix, entry.v_ix)
                };
                if other_ix.is_none_or(|o| tail == o) {
                    f(tail, head, &entry.key, &entry.label);
                }
            }
        }
    }

    pub fn for_each_in_edge_entry_ix(
        &self,
        v_ix: usize,
        mut f: impl FnMut(usize, usize, usize, &EdgeKey, &E),
    ) {
        for (ix, entry) in self.edges.iter().enumerate() {
            let Some(entry) = entry else { continue };
            if entry.w_ix == v_ix {
                f(ix, entry.v_ix, entry.w_ix, &entry.key, &entry.label);
            }
        }
    }

    pub fn for_each_out_edge_entry_ix(
        &self,
        v_ix: usize,
        mut f: impl FnMut(usize, usize, usize, &EdgeKey, &E),
    ) {
        for (ix, entry) in self.edges.iter().enumerate() {
            let Some(entry) = entry else { continue };
            if entry.v_ix == v_ix {
                f(ix, entry.v_ix, entry.w_ix, &entry.key, &entry.label);
            }
        }
    }

    fn ensure_undirected_cache(&mut self) {
        if self.undirected_cache.is_some() {
            return;
        }
        let n = self.nodes.len();
        let mut count = vec![0usize; n];
        for entry in self.edges.iter().flatten() {
            count[entry.v_ix] += 1;
            if entry.v_ix != entry.w_ix {
                count[entry.w_ix] += 1;
            }
        }
        let mut offsets = vec![0usize; n + 1];
        for i in 0..n {
            offsets[i + 1] = offsets[i] + count[i];
        }
        let mut edges = vec![0usize; offsets[n]];
        let mut cursor = offsets.clone();
        for (ix, entry) in self.edges.iter().enumerate() {
            let Some(entry) = entry else { continue };
            edges[cursor[entry.v_ix]] = ix;
            cursor[entry.v_ix] += 1;
            if entry.v_ix != entry.w_ix {
                edges[cursor[entry.w_ix]] = ix;
                cursor[entry.w_ix] += 1;
            }
        }
        self.undirected_cache = Some(UndirectedAdjCache {
            generation: self.generation,
            offsets,
            edges,
        });
    }

    pub fn for_each_undirected_edge_ix(
        &mut self,
        v_ix: usize,
        mut f: impl FnMut(usize, &EdgeKey, &E),
    ) {
        self.ensure_undirected_cache();
        let cache = self.undirected_cache.as_ref().unwrap();
        for &eix in cache.edges(v_ix) {
            if let Some(entry) = &self.edges[eix] {
                let other = if entry.v_ix == v_ix {
                    entry.w_ix
                } else {
                    entry.v_ix
                };
                f(other, &entry.key, &entry.label);
            }
        }
    }

    // ---- compound tree (only meaningful when `options.compound`) ----

    pub fn set_parent(&mut self, child: impl AsRef<str>, parent: impl AsRef<str>) {
        let Some(child_ix) = self.node_ix(child.as_ref()) else {
            return;
        };
        let parent_ix = self.node_ix(parent.as_ref());
        self.set_parent_ref(child_ix, parent_ix);
    }

    pub fn set_parent_ref(&mut self, child_ix: usize, parent_ix: Option<usize>) {
        if let Some(old_parent) = self.parent_by_ix[child_ix].take() {
            self.children_by_ix[old_parent].retain(|&c| c != child_ix);
        }
        self.parent_by_ix[child_ix] = parent_ix;
        if let Some(parent_ix) = parent_ix {
            self.children_by_ix[parent_ix].push(child_ix);
        }
    }

    pub fn clear_parent(&mut self, child: &str) {
        let Some(child_ix) = self.node_ix(child) else {
            return;
        };
        self.set_parent_ref(child_ix, None);
    }

    pub fn parent(&self, child: &str) -> Option<&str> {
        let child_ix = self.node_ix(child)?;
        let parent_ix = self.parent_by_ix[child_ix]?;
        self.node_id_by_ix(parent_ix)
    }

    pub fn children(&self, v: &str) -> Vec<&str> {
        let Some(v_ix) = self.node_ix(v) else {
            return Vec::new();
        };
        self.children_by_ix[v_ix]
            .iter()
            .filter_map(|&c| self.node_id_by_ix(c))
            .collect()
    }

    pub fn children_iter<'a>(&'a self, v: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.children(v).into_iter()
    }

    /// Roots of the compound forest: nodes with no parent, in insertion order.
    pub fn children_root(&self) -> Vec<&str> {
        self.nodes().filter(|v| self.parent(v).is_none()).collect()
    }

    /// Sets a path of compound ancestors, e.g. `set_path(&["a", "a.b", "a.b.c"])` makes
    /// `a.b` a child of `a` and `a.b.c` a child of `a.b`, creating any missing nodes along
    /// the way with the default label.
    pub fn set_path(&mut self, path: &[&str])
    where
        N: Clone + Default,
    {
        let mut parent: Option<String> = None;
        for &id in path {
            self.ensure_node(id);
            if let Some(parent) = &parent {
                self.set_parent(id, parent.as_str());
            }
            parent = Some(id.to_string());
        }
    }
}
