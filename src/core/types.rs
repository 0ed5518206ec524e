use serde::{Deserialize, Serialize};

/// Orientation of a contig within its scaffold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    #[serde(rename = "FOW")]
    Forward,
    #[serde(rename = "REV")]
    Reverse,
}

impl Orientation {
    /// Parse an orientation attribute (`FOW` or `REV`)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "FOW" => Some(Self::Forward),
            "REV" => Some(Self::Reverse),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Forward => "FOW",
            Self::Reverse => "REV",
        }
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One of the two ends of a contig, as stored in a `(start, end)` coordinate pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContigEnd {
    Start,
    End,
}

impl ContigEnd {
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Start => Self::End,
            Self::End => Self::Start,
        }
    }
}

/// Which ends of two linked contigs are joined (`E` = end, `B` = beginning)
///
/// The first letter names the end of the link's source contig that sits at the
/// junction. The second letter names the far end of the target contig, i.e. the
/// end pointing away from the junction, so `EE` chains two forward contigs head
/// to tail.
///
/// Some tools write the second letter as the target end *at* the junction. Under
/// that convention `EB`, `BB` and `BE` place the target in the opposite direction
/// from this table. Graphs written that way show up as orientation conflicts
/// against the contigs' `orientation` attributes, so check the convention of the
/// scaffolder that produced the graph.
///
/// | Code | Source end at junction | Target end at junction | Target, forward source |
/// |------|------------------------|------------------------|------------------------|
/// | `EE` | end                    | start                  | forward                |
/// | `EB` | end                    | end                    | reversed               |
/// | `BB` | start                  | end                    | forward                |
/// | `BE` | start                  | start                  | reversed               |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkOrientation {
    EE,
    EB,
    BB,
    BE,
}

impl LinkOrientation {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "EE" => Some(Self::EE),
            "EB" => Some(Self::EB),
            "BB" => Some(Self::BB),
            "BE" => Some(Self::BE),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::EE => "EE",
            Self::EB => "EB",
            Self::BB => "BB",
            Self::BE => "BE",
        }
    }

    /// The `(source, target)` ends that touch the junction
    #[must_use]
    pub fn junction_ends(self) -> (ContigEnd, ContigEnd) {
        let source = match self {
            Self::EE | Self::EB => ContigEnd::End,
            Self::BB | Self::BE => ContigEnd::Start,
        };
        let target_far = match self {
            Self::EE | Self::BE => ContigEnd::End,
            Self::EB | Self::BB => ContigEnd::Start,
        };
        (source, target_far.opposite())
    }
}

impl std::fmt::Display for LinkOrientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
