//! The closed datatype set, partitioned into broad and narrow,
//! each tagged with the project-tree level(s) it can appear at. Modelled
//! as a tagged record per datatype, not a polymorphic "Directory" object —
//! the `used`/displayed-in-UI flag is persistent-settings state,
//! not a property of the datatype, so it is not modelled here.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatatypeClass {
    Broad,
    Narrow,
}

/// Level(s) a datatype folder may legally appear at. `anat` (and its
/// legacy alias `histology`) is the one datatype fixed at both levels;
/// the resolver picks whichever level exists on disk, preferring
/// session-level when both do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatatypeLevel {
    Session,
    Subject,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Datatype {
    pub name: &'static str,
    pub class: DatatypeClass,
    pub level: DatatypeLevel,
}

/// Canonical NeuroBlueprint datatype table. Broad datatypes are the
/// original four (`ephys`, `behav`, `funcimg`, `anat`); narrow datatypes
/// are the extended, more specific set layered on top of them.
pub const DATATYPES: &[Datatype] = &[
    Datatype { name: "ephys", class: DatatypeClass::Broad, level: DatatypeLevel::Session },
    Datatype { name: "behav", class: DatatypeClass::Broad, level: DatatypeLevel::Session },
    Datatype { name: "funcimg", class: DatatypeClass::Broad, level: DatatypeLevel::Session },
    Datatype { name: "anat", class: DatatypeClass::Broad, level: DatatypeLevel::Both },
    Datatype { name: "ecephys", class: DatatypeClass::Narrow, level: DatatypeLevel::Session },
    Datatype { name: "icephys", class: DatatypeClass::Narrow, level: DatatypeLevel::Session },
    Datatype { name: "fusi", class: DatatypeClass::Narrow, level: DatatypeLevel::Session },
    Datatype { name: "motion", class: DatatypeClass::Narrow, level: DatatypeLevel::Session },
    Datatype { name: "f2pe", class: DatatypeClass::Narrow, level: DatatypeLevel::Session },
    Datatype { name: "micr", class: DatatypeClass::Narrow, level: DatatypeLevel::Session },
    Datatype { name: "nirs", class: DatatypeClass::Narrow, level: DatatypeLevel::Session },
];

/// Legacy alias from `original_source/datashuttle/configs/canonical_directories.py`:
/// the older Python implementation used `histology` where current
/// NeuroBlueprint uses `anat` at subject level.
pub const HISTOLOGY_ALIAS_FOR: &str = "anat";

pub fn find_datatype(name: &str) -> Option<&'static Datatype> {
    let canonical = if name == "histology" { HISTOLOGY_ALIAS_FOR } else { name };
    DATATYPES.iter().find(|d| d.name == canonical)
}

pub fn is_known_datatype(name: &str) -> bool {
    find_datatype(name).is_some()
}

pub fn datatype_names() -> impl Iterator<Item = &'static str> {
    DATATYPES.iter().map(|d| d.name)
}
