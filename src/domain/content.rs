//! Content table: element properties, reaction pairs and id↔key maps loaded
//! from a bundle (§4.A, §6.1).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::elements::{
    BehaviorKind, Category, ElementFlags, ElementId, ElementProps, PhaseChange, Reaction,
    FLAG_COLD, FLAG_CONDUCTIVE, FLAG_CORROSIVE, FLAG_FLAMMABLE, FLAG_HOT, FLAG_IGNORE_GRAVITY,
    FLAG_NONE, FLAG_RIGID, REACTION_LUT_SIZE,
};
use crate::error::EngineError;

#[derive(Clone)]
pub struct ContentRegistry {
    elements: Vec<ElementProps>,
    behavior_kind_by_id: Vec<BehaviorKind>,
    phase_changes: Vec<PhaseChange>,
    reaction_lut: Vec<Option<Reaction>>,
    element_key_to_id: HashMap<String, ElementId>,
    element_manifest: Vec<ContentManifestElement>,
}

impl ContentRegistry {
    pub fn from_bundle_json(json: &str) -> Result<Self, EngineError> {
        let bundle: BundleRoot = serde_json::from_str(json)
            .map_err(|e| EngineError::content_bundle_invalid("<bundle>", e.to_string()))?;
        Self::from_bundle(bundle)
    }

    /// The bundle shipped with the engine so the world is usable without a
    /// host-provided content pack — analogous to the teacher's hand-written
    /// `base:*` key table, but built from data this crate owns outright
    /// rather than codegen'd from a definitions file that isn't part of this
    /// repo.
    pub fn default_bundle() -> Self {
        Self::from_bundle_json(crate::domain::default_bundle::DEFAULT_BUNDLE_JSON)
            .expect("built-in default content bundle must be valid")
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn is_valid_element_id(&self, id: ElementId) -> bool {
        (id as usize) < self.elements.len()
    }

    pub fn props(&self, id: ElementId) -> Option<&ElementProps> {
        self.elements.get(id as usize)
    }

    pub fn category_of(&self, id: ElementId) -> Option<Category> {
        self.props(id).map(|p| p.category)
    }

    pub fn behavior_kind(&self, id: ElementId) -> BehaviorKind {
        self.behavior_kind_by_id
            .get(id as usize)
            .copied()
            .unwrap_or(BehaviorKind::None)
    }

    pub fn phase_change(&self, id: ElementId) -> PhaseChange {
        self.phase_changes.get(id as usize).copied().unwrap_or(PhaseChange::NONE)
    }

    pub fn check_phase_change(&self, id: ElementId, temp: f32) -> Option<ElementId> {
        let pc = self.phase_change(id);
        if let Some((threshold, new_el)) = pc.high {
            if temp > threshold {
                return Some(new_el);
            }
        }
        if let Some((threshold, new_el)) = pc.low {
            if temp < threshold {
                return Some(new_el);
            }
        }
        None
    }

    pub fn reaction(&self, aggressor: ElementId, victim: ElementId) -> Option<&Reaction> {
        let idx = ((aggressor as usize) << 8) | (victim as usize);
        self.reaction_lut.get(idx)?.as_ref()
    }

    pub fn id_by_key(&self, key: &str) -> Option<ElementId> {
        self.element_key_to_id.get(key).copied()
    }

    pub fn manifest_json(&self) -> String {
        let out = ContentManifest { format_version: 1, elements: &self.element_manifest };
        serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
    }

    /// Small per-seed RGB offset around the element's base color, packed
    /// ABGR. `seed` only uses its low 5 bits (32-entry palette, §3.2).
    pub fn color_with_variation(&self, id: ElementId, seed: u8) -> Option<u32> {
        let base = self.props(id)?.color;
        let i = (seed & 31) as i32;
        let variation = (i - 16) * 2;

        let a = (base >> 24) & 0xFF;
        let r = (((base >> 16) & 0xFF) as i32 + variation).clamp(0, 255) as u32;
        let g = (((base >> 8) & 0xFF) as i32 + variation).clamp(0, 255) as u32;
        let b = ((base & 0xFF) as i32 + variation).clamp(0, 255) as u32;

        Some((a << 24) | (b << 16) | (g << 8) | r)
    }

    fn from_bundle(bundle: BundleRoot) -> Result<Self, EngineError> {
        let inv = |reason: String| EngineError::content_bundle_invalid("<bundle>", reason);

        let mut max_id: u16 = 0;
        for el in bundle.elements.iter() {
            if el.id > max_id {
                max_id = el.id;
            }
        }
        if max_id > (u8::MAX as u16) {
            return Err(inv(format!("too many elements for u8 ids: max_id={}", max_id)));
        }

        let len = (max_id as usize) + 1;
        let mut props_by_id: Vec<Option<ElementProps>> = vec![None; len];
        let mut behavior_by_id: Vec<Option<BehaviorKind>> = vec![None; len];
        let mut phase_by_id: Vec<Option<PhaseChange>> = vec![None; len];
        let mut manifest_by_id: Vec<Option<ContentManifestElement>> = vec![None; len];

        let mut element_key_to_id = HashMap::new();

        for el in bundle.elements.into_iter() {
            let id = el.id as ElementId;

            let (category, category_flag) = category_from_str(&el.category).map_err(&inv)?;

            let density = match el.density {
                Some(v) => v,
                None => match category {
                    Category::Utility | Category::Energy | Category::Bio => 0.0,
                    _ => {
                        return Err(inv(format!(
                            "element {} ({}) has null density but category requires a density",
                            id, &el.key
                        )))
                    }
                },
            };

            let mut flags: ElementFlags = FLAG_NONE;
            let _ = category_flag;
            if el.flags.flammable {
                flags |= FLAG_FLAMMABLE;
            }
            if el.flags.conductive {
                flags |= FLAG_CONDUCTIVE;
            }
            if el.flags.corrosive {
                flags |= FLAG_CORROSIVE;
            }
            if el.flags.hot {
                flags |= FLAG_HOT;
            }
            if el.flags.cold {
                flags |= FLAG_COLD;
            }
            if el.flags.ignore_gravity {
                flags |= FLAG_IGNORE_GRAVITY;
            }
            if el.flags.rigid {
                flags |= FLAG_RIGID;
            }

            let behavior_kind = match el.behavior.as_deref() {
                None => BehaviorKind::None,
                Some(s) => behavior_kind_from_str(s).map_err(&inv)?,
            };

            let phase = match el.phase_change {
                None => PhaseChange::NONE,
                Some(pc) => PhaseChange {
                    high: pc.high.map(|h| (h.temp as f32, h.to_id as ElementId)),
                    low: pc.low.map(|l| (l.temp as f32, l.to_id as ElementId)),
                },
            };

            let props = ElementProps {
                color: el.color,
                density: density as f32,
                category,
                flags,
                dispersion: el.dispersion,
                lifetime: el.lifetime,
                default_temp: el.default_temp as f32,
                heat_conductivity: el.heat_conductivity,
                bounce: el.bounce as f32,
                friction: el.friction as f32,
            };

            let idx = id as usize;
            if idx >= props_by_id.len() {
                return Err(inv(format!("element id out of range: {}", idx)));
            }
            if props_by_id[idx].is_some() {
                return Err(inv(format!("duplicate element id: {}", idx)));
            }

            props_by_id[idx] = Some(props);
            behavior_by_id[idx] = Some(behavior_kind);
            phase_by_id[idx] = Some(phase);

            let key = el.key;
            element_key_to_id.insert(key.clone(), id);

            let ui = el.ui.map(|ui| ContentManifestElementUi {
                category: ui.category,
                display_name: ui.display_name,
                description: ui.description,
                sort: ui.sort,
                hidden: ui.hidden,
            });

            manifest_by_id[idx] = Some(ContentManifestElement {
                id,
                key,
                pack: el.pack,
                name: el.name,
                color: el.color,
                hidden: el.hidden,
                ui,
            });
        }

        if !matches!(props_by_id.first(), Some(Some(_))) {
            return Err(inv("missing element id 0 (empty)".to_string()));
        }

        for (k, v) in bundle.element_key_to_id.into_iter() {
            let id = v;
            if id > (u8::MAX as u16) {
                return Err(inv(format!("elementKeyToId contains u16 id not supported yet: {}", id)));
            }
            let id8 = id as ElementId;
            match element_key_to_id.get(&k) {
                Some(existing) if *existing == id8 => {}
                Some(existing) => {
                    return Err(inv(format!(
                        "elementKeyToId mismatch for key {}: map={} elements={}",
                        k, id8, existing
                    )));
                }
                None => {
                    element_key_to_id.insert(k, id8);
                }
            }
        }

        let mut elements = Vec::with_capacity(props_by_id.len());
        let mut behavior_kind_by_id = Vec::with_capacity(props_by_id.len());
        let mut phase_changes = Vec::with_capacity(props_by_id.len());
        let mut element_manifest = Vec::with_capacity(props_by_id.len());

        for idx in 0..props_by_id.len() {
            let props = props_by_id[idx].ok_or_else(|| inv(format!("missing element id {}", idx)))?;
            let kind = behavior_by_id[idx].unwrap_or(BehaviorKind::None);
            let phase = phase_by_id[idx].unwrap_or(PhaseChange::NONE);
            let meta = manifest_by_id[idx]
                .clone()
                .ok_or_else(|| inv(format!("missing element manifest for id {}", idx)))?;

            elements.push(props);
            behavior_kind_by_id.push(kind);
            phase_changes.push(phase);
            element_manifest.push(meta);
        }

        let mut reaction_lut = vec![None; REACTION_LUT_SIZE];
        for r in bundle.reactions.into_iter() {
            let aggressor = r.aggressor_id as ElementId;
            let victim = r.victim_id as ElementId;

            let target_becomes = r.result_victim_id as ElementId;
            let source_becomes = r.result_aggressor_id.map(|v| v as ElementId).unwrap_or(crate::domain::elements::EL_EMPTY);

            let chance = chance_to_u8(r.chance);
            let spawn = r.spawn_id.map(|v| v as ElementId).unwrap_or(0);

            let reaction = Reaction { target_becomes, source_becomes, chance, spawn };

            let idx = ((aggressor as usize) << 8) | (victim as usize);
            if idx >= reaction_lut.len() {
                return Err(inv(format!("reaction idx out of range: {}", idx)));
            }
            reaction_lut[idx] = Some(reaction);
        }

        Ok(Self {
            elements,
            behavior_kind_by_id,
            phase_changes,
            reaction_lut,
            element_key_to_id,
            element_manifest,
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ContentManifest<'a> {
    format_version: u32,
    elements: &'a [ContentManifestElement],
}

#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentManifestElement {
    id: ElementId,
    key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pack: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    color: u32,
    hidden: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    ui: Option<ContentManifestElementUi>,
}

#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentManifestElementUi {
    category: String,
    display_name: String,
    description: String,
    sort: i32,
    hidden: bool,
}

fn chance_to_u8(chance: f64) -> u8 {
    let v = (chance * 255.0).round();
    if v <= 0.0 {
        0
    } else if v >= 255.0 {
        255
    } else {
        v as u8
    }
}

fn behavior_kind_from_str(s: &str) -> Result<BehaviorKind, String> {
    match s {
        "bio_plant" => Ok(BehaviorKind::BioPlant),
        "bio_seed" => Ok(BehaviorKind::BioSeed),
        "energy_electricity" => Ok(BehaviorKind::EnergyElectricity),
        "energy_fire" => Ok(BehaviorKind::EnergyFire),
        "energy_spark" => Ok(BehaviorKind::EnergySpark),
        "utility_clone" => Ok(BehaviorKind::UtilityClone),
        "utility_void" => Ok(BehaviorKind::UtilityVoid),
        _ => Err(format!("unknown behavior kind: {}", s)),
    }
}

fn category_from_str(s: &str) -> Result<(Category, ElementFlags), String> {
    match s {
        "solid" => Ok((Category::Solid, FLAG_NONE)),
        "powder" => Ok((Category::Powder, FLAG_NONE)),
        "liquid" => Ok((Category::Liquid, FLAG_NONE)),
        "gas" => Ok((Category::Gas, FLAG_NONE)),
        "energy" => Ok((Category::Energy, FLAG_NONE)),
        "utility" => Ok((Category::Utility, FLAG_NONE)),
        "bio" => Ok((Category::Bio, FLAG_NONE)),
        _ => Err(format!("unknown category: {}", s)),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BundleRoot {
    elements: Vec<BundleElement>,
    #[serde(default)]
    element_key_to_id: HashMap<String, u16>,
    reactions: Vec<BundleReaction>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BundleElement {
    id: u16,
    key: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    pack: Option<String>,
    category: String,
    color: u32,
    #[serde(default)]
    density: Option<f64>,
    dispersion: u8,
    lifetime: u16,
    default_temp: f64,
    heat_conductivity: u8,
    bounce: f64,
    friction: f64,
    flags: BundleElementFlags,
    #[serde(default)]
    behavior: Option<String>,
    #[serde(default)]
    phase_change: Option<BundlePhaseChange>,
    #[serde(default)]
    hidden: bool,
    #[serde(default)]
    ui: Option<BundleElementUi>,
}

#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BundleElementUi {
    category: String,
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    sort: i32,
    #[serde(default)]
    hidden: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BundleElementFlags {
    #[serde(default)]
    flammable: bool,
    #[serde(default)]
    conductive: bool,
    #[serde(default)]
    corrosive: bool,
    #[serde(default)]
    hot: bool,
    #[serde(default)]
    cold: bool,
    #[serde(default)]
    ignore_gravity: bool,
    #[serde(default)]
    rigid: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BundlePhaseChange {
    #[serde(default)]
    high: Option<BundlePhaseEndpoint>,
    #[serde(default)]
    low: Option<BundlePhaseEndpoint>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BundlePhaseEndpoint {
    temp: f64,
    to_id: u16,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BundleReaction {
    aggressor_id: u16,
    victim_id: u16,
    #[serde(default)]
    result_aggressor_id: Option<u16>,
    result_victim_id: u16,
    #[serde(default)]
    spawn_id: Option<u16>,
    chance: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bundle_loads() {
        let reg = ContentRegistry::default_bundle();
        assert!(reg.element_count() >= crate::domain::elements::DEFAULT_ELEMENT_COUNT);
        assert_eq!(reg.id_by_key("base:empty"), Some(crate::domain::elements::EL_EMPTY));
    }

    #[test]
    fn duplicate_id_rejected() {
        let json = r#"{
            "elements": [
                {"id":0,"key":"base:empty","category":"solid","color":0,"dispersion":0,"lifetime":0,"defaultTemp":20,"heatConductivity":0,"bounce":0,"friction":0,"flags":{}},
                {"id":0,"key":"base:dup","category":"solid","color":0,"dispersion":0,"lifetime":0,"defaultTemp":20,"heatConductivity":0,"bounce":0,"friction":0,"flags":{}}
            ],
            "elementKeyToId": {},
            "reactions": []
        }"#;
        assert!(ContentRegistry::from_bundle_json(json).is_err());
    }

    #[test]
    fn color_variation_is_seed_symmetric() {
        let reg = ContentRegistry::default_bundle();
        let lo = reg.color_with_variation(crate::domain::elements::EL_SAND, 0).unwrap();
        let hi = reg.color_with_variation(crate::domain::elements::EL_SAND, 31).unwrap();
        assert_ne!(lo, hi);
    }
}
