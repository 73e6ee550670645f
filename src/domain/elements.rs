//! Element id space, property rows and the types a loaded content bundle fills in.
//!
//! `base:*` ids below are the ids of the bundled default content
//! (see `content::ContentRegistry::default_bundle`), not a hardcoded element
//! table — every other id is whatever a loaded bundle assigns.

pub type ElementId = u8;

pub const EL_EMPTY: ElementId = 0;
pub const EL_STONE: ElementId = 1;
pub const EL_SAND: ElementId = 2;
pub const EL_WOOD: ElementId = 3;
pub const EL_METAL: ElementId = 4;
pub const EL_ICE: ElementId = 5;
pub const EL_WATER: ElementId = 6;
pub const EL_OIL: ElementId = 7;
pub const EL_LAVA: ElementId = 8;
pub const EL_ACID: ElementId = 9;
pub const EL_STEAM: ElementId = 10;
pub const EL_SMOKE: ElementId = 11;
pub const EL_FIRE: ElementId = 12;
pub const EL_SPARK: ElementId = 13;
pub const EL_ELECTRICITY: ElementId = 14;
pub const EL_GUNPOWDER: ElementId = 15;
pub const EL_CLONE: ElementId = 16;
pub const EL_VOID: ElementId = 17;
pub const EL_DIRT: ElementId = 18;
pub const EL_SEED: ElementId = 19;
pub const EL_PLANT: ElementId = 20;

pub const DEFAULT_ELEMENT_COUNT: usize = 21;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Solid,
    Powder,
    Liquid,
    Gas,
    Energy,
    Utility,
    Bio,
}

pub type ElementFlags = u16;
pub const FLAG_NONE: ElementFlags = 0;
pub const FLAG_FLAMMABLE: ElementFlags = 1 << 0;
pub const FLAG_CONDUCTIVE: ElementFlags = 1 << 1;
pub const FLAG_CORROSIVE: ElementFlags = 1 << 2;
pub const FLAG_HOT: ElementFlags = 1 << 3;
pub const FLAG_COLD: ElementFlags = 1 << 4;
pub const FLAG_IGNORE_GRAVITY: ElementFlags = 1 << 5;
pub const FLAG_RIGID: ElementFlags = 1 << 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BehaviorKind {
    None,
    BioPlant,
    BioSeed,
    EnergyElectricity,
    EnergyFire,
    EnergySpark,
    UtilityClone,
    UtilityVoid,
}

#[derive(Debug, Clone, Copy)]
pub struct PhaseChange {
    pub high: Option<(f32, ElementId)>,
    pub low: Option<(f32, ElementId)>,
}

impl PhaseChange {
    pub const NONE: PhaseChange = PhaseChange { high: None, low: None };
}

#[derive(Debug, Clone, Copy)]
pub struct ElementProps {
    pub color: u32,
    pub density: f32,
    pub category: Category,
    pub flags: ElementFlags,
    pub dispersion: u8,
    pub lifetime: u16,
    pub default_temp: f32,
    pub heat_conductivity: u8,
    pub bounce: f32,
    pub friction: f32,
}

impl ElementProps {
    #[inline]
    pub fn has_flag(&self, flag: ElementFlags) -> bool {
        self.flags & flag != 0
    }
}

pub const REACTION_LUT_SIZE: usize = 256 * 256;

/// `source_becomes`/`target_becomes` are always applied — a bundle's
/// `resultAggressorId: null` means the aggressor is deleted (becomes
/// `EL_EMPTY`), not left untouched (§4.C Phase 4).
#[derive(Debug, Clone, Copy)]
pub struct Reaction {
    pub target_becomes: ElementId,
    pub source_becomes: ElementId,
    pub chance: u8,
    pub spawn: ElementId,
}
