use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

use nexus_randomizer_core::LevelId;
use serde::{
    de::{DeserializeSeed, MapAccess, Visitor},
    Deserialize, Deserializer,
};

/// Identifier of a node within a [`CommunityTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommunityNodeId(usize);

impl CommunityNodeId {
    /// Arena index of the node.
    #[must_use]
    pub const fn get(&self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct CommunityNode {
    name: String,
    children: Vec<CommunityNodeId>,
}

/// Door-chasing tree of community hubs, stored as an arena.
///
/// Each node names a level; a node without children is a playable leaf and a
/// node with children is a hub whose doors lead to them. Deserializes from the
/// nested `{"level": {...} | null}` form, keeping document order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommunityTree {
    nodes: Vec<CommunityNode>,
    roots: Vec<CommunityNodeId>,
}

impl CommunityTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a node under `parent`, or as a new root when `parent` is `None`.
    pub fn push(
        &mut self,
        parent: Option<CommunityNodeId>,
        name: impl Into<String>,
    ) -> CommunityNodeId {
        let id = CommunityNodeId(self.nodes.len());
        self.nodes.push(CommunityNode {
            name: name.into(),
            children: Vec::new(),
        });
        match parent {
            Some(parent) => self.nodes[parent.0].children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Reports whether the tree has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl<'de> Deserialize<'de> for CommunityTree {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut nodes = Vec::new();
        let roots = Subtree { nodes: &mut nodes }.deserialize(deserializer)?;
        Ok(Self { nodes, roots })
    }
}

struct Subtree<'a> {
    nodes: &'a mut Vec<CommunityNode>,
}

impl<'de> DeserializeSeed<'de> for Subtree<'_> {
    type Value = Vec<CommunityNodeId>;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_option(self)
    }
}

impl<'de> Visitor<'de> for Subtree<'_> {
    type Value = Vec<CommunityNodeId>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a map of community levels or null")
    }

    fn visit_none<E>(self) -> Result<Self::Value, E> {
        Ok(Vec::new())
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E> {
        Ok(Vec::new())
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(self)
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let nodes = self.nodes;
        let mut children = Vec::new();
        while let Some(name) = map.next_key::<String>()? {
            let id = CommunityNodeId(nodes.len());
            nodes.push(CommunityNode {
                name,
                children: Vec::new(),
            });
            let grandchildren = map.next_value_seed(Subtree {
                nodes: &mut *nodes,
            })?;
            nodes[id.0].children = grandchildren;
            children.push(id);
        }
        Ok(children)
    }
}

/// Hubs whose reachable levels feed a filter predicate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WantTree {
    /// Clockwise loop of the main community nexus.
    Clockwise,
    /// Counter-clockwise loop of the main community nexus.
    CounterClockwise,
    /// The clunky nexus.
    Clunky,
    /// The backwards main nexus.
    Backwards,
}

impl WantTree {
    /// Every wanted hub.
    pub const ALL: [WantTree; 4] = [
        Self::Clockwise,
        Self::CounterClockwise,
        Self::Clunky,
        Self::Backwards,
    ];

    /// Level name of the hub in the community tree.
    #[must_use]
    pub const fn hub_name(self) -> &'static str {
        match self {
            Self::Clockwise => "Main Nexus CW",
            Self::CounterClockwise => "Main Nexus CCW",
            Self::Clunky => "clunknexusdx",
            Self::Backwards => "Main Nexus Backwards",
        }
    }

    fn from_hub_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tree| tree.hub_name() == name)
    }
}

/// Flattened membership sets derived from a [`CommunityTree`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommunityReachability {
    community: BTreeSet<LevelId>,
    wanted: BTreeMap<WantTree, BTreeSet<LevelId>>,
}

impl CommunityReachability {
    /// Walks the tree once, collecting every leaf and the leaves below each
    /// wanted hub.
    ///
    /// A wanted hub that appears more than once keeps the leaves of the
    /// occurrence finished last in post-order.
    #[must_use]
    pub fn from_tree(tree: &CommunityTree) -> Self {
        enum Visit {
            Enter(CommunityNodeId),
            Exit(CommunityNodeId, usize),
        }

        let mut leaves: Vec<&str> = Vec::new();
        let mut wanted = BTreeMap::new();
        let mut stack: Vec<Visit> = tree.roots.iter().rev().map(|&id| Visit::Enter(id)).collect();

        while let Some(visit) = stack.pop() {
            match visit {
                Visit::Enter(id) => {
                    let node = &tree.nodes[id.0];
                    if node.children.is_empty() {
                        leaves.push(&node.name);
                        continue;
                    }
                    stack.push(Visit::Exit(id, leaves.len()));
                    stack.extend(node.children.iter().rev().map(|&child| Visit::Enter(child)));
                }
                Visit::Exit(id, first_leaf) => {
                    if let Some(want) = WantTree::from_hub_name(&tree.nodes[id.0].name) {
                        let below = leaves[first_leaf..]
                            .iter()
                            .map(|&leaf| LevelId::new(leaf))
                            .collect();
                        let _ = wanted.insert(want, below);
                    }
                }
            }
        }

        Self {
            community: leaves.into_iter().map(LevelId::new).collect(),
            wanted,
        }
    }

    /// Reports whether the level is reachable anywhere in the community tree.
    #[must_use]
    pub fn is_community(&self, level: &str) -> bool {
        self.community.contains(level)
    }

    /// Reports whether the level is reachable from the wanted hub.
    #[must_use]
    pub fn in_tree(&self, tree: WantTree, level: &str) -> bool {
        self.wanted
            .get(&tree)
            .map_or(false, |levels| levels.contains(level))
    }

    /// Every community leaf level.
    #[must_use]
    pub fn community_levels(&self) -> &BTreeSet<LevelId> {
        &self.community
    }

    /// Number of leaves reachable from the wanted hub.
    #[must_use]
    pub fn tree_size(&self, tree: WantTree) -> usize {
        self.wanted.get(&tree).map_or(0, BTreeSet::len)
    }
}
