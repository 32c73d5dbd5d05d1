//! Semantic model for the two diagram families: the temporal "tree of vines" and the
//! credential DAG.
//!
//! Graphs are constructed once from data and immutable afterwards. Construction is
//! where invariants are checked: root/shoot links must be monotonic in time-height,
//! and the credential relation graph must be acyclic (`Recommended` edges are
//! advisory and exempt). Dangling link targets are dropped with a warning rather
//! than failing the whole data set.

use crate::error::{Error, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Categorical lane ("vine") of the temporal diagram. The order here is the
/// left-to-right lane order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vine {
    History,
    Philosophy,
    Science,
    Mathematics,
    Arts,
    Technology,
}

impl Vine {
    pub const ALL: [Vine; 6] = [
        Vine::History,
        Vine::Philosophy,
        Vine::Science,
        Vine::Mathematics,
        Vine::Arts,
        Vine::Technology,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Vine::History => "history",
            Vine::Philosophy => "philosophy",
            Vine::Science => "science",
            Vine::Mathematics => "mathematics",
            Vine::Arts => "arts",
            Vine::Technology => "technology",
        }
    }

    pub fn from_name(name: &str) -> Option<Vine> {
        Vine::ALL
            .into_iter()
            .find(|v| v.name().eq_ignore_ascii_case(name.trim()))
    }
}

/// Temporal band derived from time-height by range lookup. Negative time-heights
/// sit before the reference epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemporalBand {
    Antiquity,
    Classical,
    Medieval,
    Modern,
    Contemporary,
}

impl TemporalBand {
    pub const ALL: [TemporalBand; 5] = [
        TemporalBand::Antiquity,
        TemporalBand::Classical,
        TemporalBand::Medieval,
        TemporalBand::Modern,
        TemporalBand::Contemporary,
    ];

    /// Lower edge of each band on the time-height axis. Bands are half-open
    /// `[start, next_start)`; the first band is unbounded below and the last above.
    pub fn start(self) -> f64 {
        match self {
            TemporalBand::Antiquity => f64::NEG_INFINITY,
            TemporalBand::Classical => -500.0,
            TemporalBand::Medieval => 500.0,
            TemporalBand::Modern => 1500.0,
            TemporalBand::Contemporary => 1900.0,
        }
    }

    pub fn from_time_height(t: f64) -> TemporalBand {
        let mut band = TemporalBand::Antiquity;
        for candidate in TemporalBand::ALL {
            if t >= candidate.start() {
                band = candidate;
            }
        }
        band
    }

    pub fn name(self) -> &'static str {
        match self {
            TemporalBand::Antiquity => "antiquity",
            TemporalBand::Classical => "classical",
            TemporalBand::Medieval => "medieval",
            TemporalBand::Modern => "modern",
            TemporalBand::Contemporary => "contemporary",
        }
    }
}

/// A node on the temporal tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VineNode {
    pub id: String,
    pub title: String,
    pub vine: Vine,
    /// Signed scalar position on the temporal axis; negative = before the epoch.
    pub time_height: f64,
    #[serde(default)]
    pub date_label: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub description: String,
    /// Earlier nodes in the same vine.
    #[serde(default)]
    pub roots: Vec<String>,
    /// Later nodes in the same vine.
    #[serde(default)]
    pub shoots: Vec<String>,
    /// Contemporaneous nodes in other vines.
    #[serde(default)]
    pub tendrils: Vec<String>,
}

impl VineNode {
    pub fn band(&self) -> TemporalBand {
        TemporalBand::from_time_height(self.time_height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionKind {
    Predecessor,
    Successor,
    CrossLink,
}

/// An edge of the temporal tree, derived from node adjacency lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    pub id: String,
    pub from: String,
    pub to: String,
    pub kind: ConnectionKind,
    /// Visual weight only, in `[0, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strength: Option<f64>,
}

/// Cross-vine cluster, drawn only as a bounding highlight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Braid {
    pub id: String,
    pub name: String,
    pub time_height: f64,
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default)]
    pub vines: Vec<Vine>,
    #[serde(default = "default_intensity")]
    pub intensity: f64,
    #[serde(default)]
    pub description: String,
}

fn default_intensity() -> f64 {
    1.0
}

impl Braid {
    pub fn band(&self) -> TemporalBand {
        TemporalBand::from_time_height(self.time_height)
    }
}

/// The temporal tree, validated and with connections derived.
#[derive(Debug, Clone)]
pub struct VineGraph {
    nodes: Vec<VineNode>,
    connections: Vec<Connection>,
    braids: Vec<Braid>,
    by_id: FxHashMap<String, usize>,
}

impl VineGraph {
    pub fn new(nodes: Vec<VineNode>, braids: Vec<Braid>) -> Result<Self> {
        let by_id: FxHashMap<String, usize> = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.clone(), i))
            .collect();

        let mut connections = Vec::new();
        let mut push = |from: &str, to: &str, kind: ConnectionKind| {
            // Deduped by (kind, pair): a shoot and a tendril between the same
            // ordered pair are distinct connections. Cross links get their own
            // id separator to keep ids unique across kinds.
            let id = match kind {
                ConnectionKind::CrossLink => format!("{from}~~{to}"),
                _ => format!("{from}--{to}"),
            };
            let duplicate = connections
                .iter()
                .any(|c: &Connection| c.kind == kind && c.from == from && c.to == to);
            if !duplicate {
                connections.push(Connection {
                    id,
                    from: from.to_string(),
                    to: to.to_string(),
                    kind,
                    strength: None,
                });
            }
        };

        for node in &nodes {
            for shoot in &node.shoots {
                let Some(&i) = by_id.get(shoot) else {
                    tracing::warn!(node = %node.id, target = %shoot, "dropping dangling shoot link");
                    continue;
                };
                let other = &nodes[i];
                if other.time_height <= node.time_height {
                    return Err(Error::NonMonotonicLink {
                        from: node.id.clone(),
                        to: other.id.clone(),
                        from_time: node.time_height,
                        to_time: other.time_height,
                    });
                }
                push(&node.id, &other.id, ConnectionKind::Successor);
            }
            for root in &node.roots {
                let Some(&i) = by_id.get(root) else {
                    tracing::warn!(node = %node.id, target = %root, "dropping dangling root link");
                    continue;
                };
                let other = &nodes[i];
                if other.time_height >= node.time_height {
                    return Err(Error::NonMonotonicLink {
                        from: other.id.clone(),
                        to: node.id.clone(),
                        from_time: other.time_height,
                        to_time: node.time_height,
                    });
                }
                // Stored from the earlier endpoint so mirrored root/shoot pairs coalesce.
                push(&other.id, &node.id, ConnectionKind::Successor);
            }
            for tendril in &node.tendrils {
                let Some(&i) = by_id.get(tendril) else {
                    tracing::warn!(node = %node.id, target = %tendril, "dropping dangling tendril link");
                    continue;
                };
                let other = &nodes[i];
                let (a, b) = if node.id <= other.id {
                    (node.id.as_str(), other.id.as_str())
                } else {
                    (other.id.as_str(), node.id.as_str())
                };
                push(a, b, ConnectionKind::CrossLink);
            }
        }

        let braids = braids
            .into_iter()
            .map(|mut braid| {
                braid.members.retain(|m| by_id.contains_key(m));
                if braid.vines.is_empty() {
                    let mut vines: Vec<Vine> = braid
                        .members
                        .iter()
                        .map(|m| nodes[by_id[m]].vine)
                        .collect();
                    vines.sort_by_key(|v| Vine::ALL.iter().position(|a| a == v));
                    vines.dedup();
                    braid.vines = vines;
                }
                braid
            })
            .collect();

        Ok(Self {
            nodes,
            connections,
            braids,
            by_id,
        })
    }

    pub fn nodes(&self) -> &[VineNode] {
        &self.nodes
    }

    pub fn node(&self, id: &str) -> Option<&VineNode> {
        self.by_id.get(id).map(|&i| &self.nodes[i])
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn braids(&self) -> &[Braid] {
        &self.braids
    }

    /// Min/max time-height over all nodes, `None` when empty.
    pub fn time_range(&self) -> Option<(f64, f64)> {
        let mut it = self.nodes.iter().map(|n| n.time_height);
        let first = it.next()?;
        let (mut min, mut max) = (first, first);
        for t in it {
            min = min.min(t);
            max = max.max(t);
        }
        Some((min, max))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cadence {
    Monthly,
    Seasonal,
}

/// Level band, ordered from youngest to oldest audience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LevelBand {
    #[serde(rename = "K-1")]
    K1,
    #[serde(rename = "2-3")]
    Grades2To3,
    #[serde(rename = "4-5")]
    Grades4To5,
    #[serde(rename = "middle")]
    Middle,
    #[serde(rename = "high")]
    High,
    #[serde(rename = "undergraduate")]
    Undergraduate,
    #[serde(rename = "graduate")]
    Graduate,
    #[serde(rename = "faculty")]
    Faculty,
}

impl LevelBand {
    pub const ALL: [LevelBand; 8] = [
        LevelBand::K1,
        LevelBand::Grades2To3,
        LevelBand::Grades4To5,
        LevelBand::Middle,
        LevelBand::High,
        LevelBand::Undergraduate,
        LevelBand::Graduate,
        LevelBand::Faculty,
    ];

    /// Position in the fixed ordering, used as a layer hint for the DAG layout.
    pub fn rank(self) -> usize {
        LevelBand::ALL
            .iter()
            .position(|b| *b == self)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    pub id: String,
    pub title: String,
    pub cadence: Cadence,
    /// Primary category ("college"), e.g. `MATH`.
    pub category: String,
    pub level: LevelBand,
    pub duration_weeks: u32,
    /// Monthly credentials may compose into a seasonal parent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_seasonal: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationKind {
    PartOf,
    Prereq,
    Recommended,
    Coreq,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialRelation {
    pub from: String,
    pub to: String,
    pub kind: RelationKind,
}

/// Credential DAG. Acyclicity over `PartOf`/`Prereq`/`Coreq` edges is enforced at
/// construction; `Recommended` edges are advisory and may point anywhere.
#[derive(Debug, Clone)]
pub struct CredentialGraph {
    credentials: Vec<Credential>,
    relations: Vec<CredentialRelation>,
    by_id: FxHashMap<String, usize>,
}

impl CredentialGraph {
    pub fn new(
        credentials: Vec<Credential>,
        mut relations: Vec<CredentialRelation>,
    ) -> Result<Self> {
        let by_id: FxHashMap<String, usize> = credentials
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id.clone(), i))
            .collect();

        relations.retain(|r| {
            let known = by_id.contains_key(&r.from) && by_id.contains_key(&r.to);
            if !known {
                tracing::warn!(from = %r.from, to = %r.to, "dropping relation with unknown endpoint");
            }
            known
        });

        Self::check_acyclic(&credentials, &relations, &by_id)?;

        Ok(Self {
            credentials,
            relations,
            by_id,
        })
    }

    fn check_acyclic(
        credentials: &[Credential],
        relations: &[CredentialRelation],
        by_id: &FxHashMap<String, usize>,
    ) -> Result<()> {
        let n = credentials.len();
        let mut out: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut indegree = vec![0usize; n];
        for r in relations {
            if r.kind == RelationKind::Recommended {
                continue;
            }
            let (from, to) = (by_id[&r.from], by_id[&r.to]);
            out[from].push(to);
            indegree[to] += 1;
        }

        let mut queue: Vec<usize> = (0..n).filter(|&i| indegree[i] == 0).collect();
        let mut seen = 0usize;
        while let Some(i) = queue.pop() {
            seen += 1;
            for &next in &out[i] {
                indegree[next] -= 1;
                if indegree[next] == 0 {
                    queue.push(next);
                }
            }
        }

        if seen == n {
            Ok(())
        } else {
            let id = indegree
                .iter()
                .position(|&d| d > 0)
                .map(|i| credentials[i].id.clone())
                .unwrap_or_default();
            Err(Error::CyclicRelations { id })
        }
    }

    pub fn credentials(&self) -> &[Credential] {
        &self.credentials
    }

    pub fn credential(&self, id: &str) -> Option<&Credential> {
        self.by_id.get(id).map(|&i| &self.credentials[i])
    }

    pub fn relations(&self) -> &[CredentialRelation] {
        &self.relations
    }
}
