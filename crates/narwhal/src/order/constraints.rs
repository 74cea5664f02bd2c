use crate::graphlib::Graph;
use rustc_hash::FxHashMap as HashMap;

pub fn add_subgraph_constraints<N, E, G, CN, CE, CG>(
    g: &Graph<N, E, G>,
    cg: &mut Graph<CN, CE, CG>,
    vs: &[String],
) where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
    CN: Default + 'static,
    CE: Default + 'static,
    CG: Default,
{
    let mut prev: HashMap<&str, &str> = HashMap::default();
    let mut root_prev: Option<&str> = None;

    for v in vs {
        let mut child = g.parent(v.as_str());
        while let Some(c) = child {
            let parent = g.parent(c);

            let prev_child = if let Some(p) = parent {
                prev.insert(p, c)
            } else {
                root_prev.replace(c)
            };

            if let Some(prev_child) = prev_child {
                if prev_child != c {
                    cg.set_edge(prev_child, c);
                    break;
                }
            }

            child = parent;
        }
    }
}

/// `ix`-addressed variant of [`add_subgraph_constraints`] used by the sweep loop in
/// [`super::order`], where `vs` is already a slice of node indices into `g` rather than a
/// freshly-allocated `Vec<String>`.
pub(super) fn add_subgraph_constraints_ix<N, E, G, CN, CE, CG>(
    g: &Graph<N, E, G>,
    cg: &mut Graph<CN, CE, CG>,
    vs: &[usize],
) where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
    CN: Default + 'static,
    CE: Default + 'static,
    CG: Default,
{
    let mut prev: HashMap<&str, &str> = HashMap::default();
    let mut root_prev: Option<&str> = None;

    for &v_ix in vs {
        let Some(v) = g.node_id_by_ix(v_ix) else {
            continue;
        };
        let mut child = g.parent(v);
        while let Some(c) = child {
            let parent = g.parent(c);

            let prev_child = if let Some(p) = parent {
                prev.insert(p, c)
            } else {
                root_prev.replace(c)
            };

            if let Some(prev_child) = prev_child {
                if prev_child != c {
                    cg.set_edge(prev_child, c);
                    break;
                }
            }

            child = parent;
        }
    }
}
