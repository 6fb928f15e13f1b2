//! Filter topology catalog.
//!
//! Every concrete circuit a chain stage can take, keyed by the stable string
//! `category-order-kind` (e.g. `lowpass-2-butterworth`). The set is closed:
//! a stage always holds one of these variants, so there is no "abstract
//! topology" to instantiate by mistake. The key lookup table is built once
//! and panics on a duplicate key — a catalog bug should surface the first
//! time the catalog is touched, not when a particular filter is selected.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde::Serialize;

use crate::stage::StageParams;

/// Filter family, as shown to the host (icon/label selection is host-side).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    BellDown,
    BellUp,
    Notch,
    BandPass,
    LowPass,
    HighPass,
    HighShelf,
    LowShelf,
}

impl Category {
    pub const fn name(self) -> &'static str {
        match self {
            Category::BellDown => "bell-down",
            Category::BellUp => "bell-up",
            Category::Notch => "notch",
            Category::BandPass => "bandpass",
            Category::LowPass => "lowpass",
            Category::HighPass => "highpass",
            Category::HighShelf => "highshelf",
            Category::LowShelf => "lowshelf",
        }
    }
}

/// Damping alignment of a second-order section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Alignment {
    Bessel,
    Butterworth,
    LinkwitzRiley,
    VariableQ,
}

impl Alignment {
    pub const fn name(self) -> &'static str {
        match self {
            Alignment::Bessel => "bessel",
            Alignment::Butterworth => "butterworth",
            Alignment::LinkwitzRiley => "linkwitz-riley",
            Alignment::VariableQ => "variable-q",
        }
    }
}

/// One concrete filter circuit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Topology {
    BellDown,
    BellUp,
    Notch,
    BandPass,
    LowPassFirstOrder,
    LowPassSecondOrder(Alignment),
    HighPassFirstOrder,
    HighPassSecondOrder(Alignment),
    HighShelf,
    LowShelf,
}

/// Serializable descriptor of a topology for host-side presentation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TopologyInfo {
    pub key: String,
    pub category: &'static str,
    pub order: u8,
    pub kind: &'static str,
}

static KEY_INDEX: LazyLock<HashMap<String, Topology>> = LazyLock::new(|| {
    let mut index = HashMap::with_capacity(Topology::ALL.len());
    for topology in Topology::ALL {
        let key = topology.key();
        let previous = index.insert(key.clone(), topology);
        assert!(previous.is_none(), "duplicate topology key `{key}` in catalog");
    }
    index
});

impl Topology {
    /// Catalog order, as presented to the host.
    pub const ALL: [Topology; 16] = [
        Topology::BellDown,
        Topology::BellUp,
        Topology::Notch,
        Topology::BandPass,
        Topology::LowPassFirstOrder,
        Topology::LowPassSecondOrder(Alignment::Bessel),
        Topology::LowPassSecondOrder(Alignment::Butterworth),
        Topology::LowPassSecondOrder(Alignment::LinkwitzRiley),
        Topology::LowPassSecondOrder(Alignment::VariableQ),
        Topology::HighPassFirstOrder,
        Topology::HighPassSecondOrder(Alignment::Bessel),
        Topology::HighPassSecondOrder(Alignment::Butterworth),
        Topology::HighPassSecondOrder(Alignment::LinkwitzRiley),
        Topology::HighPassSecondOrder(Alignment::VariableQ),
        Topology::HighShelf,
        Topology::LowShelf,
    ];

    /// Topology used by `Chain::append_default` — the first catalog entry.
    pub const DEFAULT: Topology = Topology::BellDown;

    pub const fn category(self) -> Category {
        match self {
            Topology::BellDown => Category::BellDown,
            Topology::BellUp => Category::BellUp,
            Topology::Notch => Category::Notch,
            Topology::BandPass => Category::BandPass,
            Topology::LowPassFirstOrder | Topology::LowPassSecondOrder(_) => Category::LowPass,
            Topology::HighPassFirstOrder | Topology::HighPassSecondOrder(_) => Category::HighPass,
            Topology::HighShelf => Category::HighShelf,
            Topology::LowShelf => Category::LowShelf,
        }
    }

    pub const fn order(self) -> u8 {
        match self {
            Topology::LowPassSecondOrder(_) | Topology::HighPassSecondOrder(_) => 2,
            _ => 1,
        }
    }

    pub const fn kind(self) -> &'static str {
        match self {
            Topology::BellDown => "simple-bell-down",
            Topology::BellUp => "simple-bell-up",
            Topology::Notch => "simple-notch",
            Topology::BandPass => "simple-bandpass",
            Topology::LowPassFirstOrder
            | Topology::HighPassFirstOrder
            | Topology::HighShelf
            | Topology::LowShelf => "default",
            Topology::LowPassSecondOrder(alignment) | Topology::HighPassSecondOrder(alignment) => {
                alignment.name()
            }
        }
    }

    /// Unique catalog key: `category-order-kind`.
    pub fn key(self) -> String {
        format!("{}-{}-{}", self.category().name(), self.order(), self.kind())
    }

    /// Look a topology up by its catalog key.
    pub fn from_key(key: &str) -> Option<Topology> {
        KEY_INDEX.get(key).copied()
    }

    pub fn info(self) -> TopologyInfo {
        TopologyInfo {
            key: self.key(),
            category: self.category().name(),
            order: self.order(),
            kind: self.kind(),
        }
    }

    /// Parameters a fresh stage of this topology starts with.
    pub fn default_params(self) -> StageParams {
        match self {
            Topology::BellDown | Topology::BellUp => StageParams {
                f0: 1000.0,
                q: Some(1.0),
                db: Some(3.0),
                l1r: Some(0.0),
            },
            Topology::Notch | Topology::BandPass => StageParams {
                f0: 1000.0,
                q: Some(1.0),
                db: None,
                l1r: Some(0.0),
            },
            Topology::LowPassFirstOrder => StageParams {
                f0: 2000.0,
                q: None,
                db: None,
                l1r: Some(0.0),
            },
            Topology::LowPassSecondOrder(alignment) => StageParams {
                f0: 2000.0,
                q: variable_q_default(alignment),
                db: None,
                l1r: Some(0.0),
            },
            Topology::HighPassFirstOrder => StageParams {
                f0: 200.0,
                q: None,
                db: None,
                l1r: None,
            },
            Topology::HighPassSecondOrder(alignment) => StageParams {
                f0: 200.0,
                q: variable_q_default(alignment),
                db: None,
                l1r: Some(0.0),
            },
            Topology::HighShelf => StageParams {
                f0: 2000.0,
                q: None,
                db: Some(3.0),
                l1r: None,
            },
            Topology::LowShelf => StageParams {
                f0: 200.0,
                q: None,
                db: Some(3.0),
                l1r: Some(0.0),
            },
        }
    }

    /// Whether this topology reads a quality factor.
    pub const fn uses_q(self) -> bool {
        matches!(
            self,
            Topology::BellDown
                | Topology::BellUp
                | Topology::Notch
                | Topology::BandPass
                | Topology::LowPassSecondOrder(Alignment::VariableQ)
                | Topology::HighPassSecondOrder(Alignment::VariableQ)
        )
    }

    /// Whether this topology reads a gain in dB.
    pub const fn uses_db(self) -> bool {
        matches!(
            self,
            Topology::BellDown | Topology::BellUp | Topology::HighShelf | Topology::LowShelf
        )
    }

    /// Whether this topology carries an inductor (and thus its parasitic
    /// series resistance).
    pub const fn uses_l1r(self) -> bool {
        !matches!(self, Topology::HighPassFirstOrder | Topology::HighShelf)
    }
}

fn variable_q_default(alignment: Alignment) -> Option<f64> {
    match alignment {
        Alignment::VariableQ => Some(0.707),
        _ => None,
    }
}

/// Catalog entries of one order within a category.
#[derive(Clone, Debug, Serialize)]
pub struct OrderGroup {
    pub order: u8,
    pub entries: Vec<TopologyInfo>,
}

/// Catalog entries of one category.
#[derive(Clone, Debug, Serialize)]
pub struct CategoryGroup {
    pub category: &'static str,
    pub orders: Vec<OrderGroup>,
}

/// The catalog nested category → order → kind, for host-side menus.
pub fn grouping() -> Vec<CategoryGroup> {
    let mut groups: Vec<CategoryGroup> = Vec::new();
    for topology in Topology::ALL {
        let category = topology.category().name();
        if groups.last().map(|g| g.category) != Some(category) {
            groups.push(CategoryGroup {
                category,
                orders: Vec::new(),
            });
        }
        let group_index = groups.len() - 1;
        let group = &mut groups[group_index];
        let order = topology.order();
        if group.orders.last().map(|o| o.order) != Some(order) {
            group.orders.push(OrderGroup {
                order,
                entries: Vec::new(),
            });
        }
        let order_index = group.orders.len() - 1;
        group.orders[order_index].entries.push(topology.info());
    }
    groups
}
