//! PC builder parts: motherboards, memory, storage, power supplies, cases
//! and coolers. Listed from `/pcbuilder/<plural>` and written under
//! `/pcbuilder/admin/<plural>/<slug>`.

use serde::{Deserialize, Serialize};

use crate::resources::schema::{FieldSpec, FormSchema};
use crate::resources::{FilterKey, KeyKind, Resource, ResourceKey, cell, yes_no};

pub const SOCKETS: &[&str] = &["AM4", "AM5", "LGA1700", "LGA1200", "LGA1151"];
pub const RAM_TYPES: &[&str] = &["DDR4", "DDR5"];
pub const BOARD_FORM_FACTORS: &[&str] = &["ATX", "Micro-ATX", "Mini-ITX", "E-ATX"];
pub const CASE_FORM_FACTORS: &[&str] = &["ATX", "Micro-ATX", "Mini-ITX", "E-ATX", "Full-Tower"];
pub const PSU_FORM_FACTORS: &[&str] = &["ATX", "SFX"];
pub const EFFICIENCIES: &[&str] = &["80+ Bronze", "80+ Gold", "80+ Platinum", "80+ Titanium"];
pub const MODULARITY: &[&str] = &["Full", "Semi", "Non"];
pub const STORAGE_TYPES: &[&str] = &["SSD", "HDD"];
pub const STORAGE_INTERFACES: &[&str] = &["NVMe", "SATA"];
pub const COOLER_TYPES: &[&str] = &["Air", "AIO-120", "AIO-240", "AIO-280", "AIO-360"];

/// Parts may be created without a slug; the backend derives one.
const PART_SLUG: FieldSpec = {
    let mut spec = FieldSpec::slug();
    spec.required = false;
    spec
};

fn active_default() -> bool {
    true
}

fn brand_facet(brand: &str, key: FilterKey) -> Option<&str> {
    match key {
        FilterKey::Brand => Some(brand),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Motherboard {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub brand: String,
    pub model: String,
    pub slug: String,
    #[serde(default)]
    pub socket: Option<String>,
    #[serde(default)]
    pub chipset: Option<String>,
    #[serde(default)]
    pub form_factor: Option<String>,
    #[serde(default)]
    pub ram_type: Option<String>,
    #[serde(default)]
    pub ram_slots: Option<u32>,
    #[serde(default, rename = "maxRamGB")]
    pub max_ram_gb: Option<u32>,
    #[serde(default)]
    pub m2_slots: Option<u32>,
    #[serde(default)]
    pub has_wifi: bool,
    #[serde(default = "active_default")]
    pub is_active: bool,
}

static MOTHERBOARD_SCHEMA: FormSchema = FormSchema {
    fields: &[
        FieldSpec::text("brand").required(),
        FieldSpec::text("model").required(),
        PART_SLUG,
        FieldSpec::choice("socket", SOCKETS),
        FieldSpec::text("chipset"),
        FieldSpec::choice("formFactor", BOARD_FORM_FACTORS),
        FieldSpec::choice("ramType", RAM_TYPES),
        FieldSpec::integer("ramSlots").default("4"),
        FieldSpec::integer("maxRamGB").default("128"),
        FieldSpec::integer("m2Slots").default("2"),
        FieldSpec::flag("hasWifi").default("false"),
        FieldSpec::flag("isActive").default("true"),
    ],
    rows: None,
};

pub struct MotherboardResource;

impl Resource for MotherboardResource {
    type Record = Motherboard;

    const NAME: &'static str = "motherboard";
    const LIST_PATH: &'static str = "/pcbuilder/motherboards";
    const WRITE_PATH: &'static str = "/pcbuilder/admin/motherboards";
    const KEY_KIND: KeyKind = KeyKind::Slug;
    const FILTERS: &'static [FilterKey] = &[FilterKey::Brand];

    fn key(record: &Motherboard) -> ResourceKey {
        ResourceKey::Slug(record.slug.clone())
    }

    fn label(record: &Motherboard) -> String {
        format!("{} {}", record.brand, record.model)
    }

    fn facet(record: &Motherboard, key: FilterKey) -> Option<&str> {
        brand_facet(&record.brand, key)
    }

    fn schema() -> &'static FormSchema {
        &MOTHERBOARD_SCHEMA
    }

    fn columns() -> &'static [&'static str] {
        &["Brand", "Model", "Socket", "Chipset", "Form", "RAM", "WiFi", "Active"]
    }

    fn cells(record: &Motherboard) -> Vec<String> {
        vec![
            record.brand.clone(),
            record.model.clone(),
            cell(&record.socket),
            cell(&record.chipset),
            cell(&record.form_factor),
            cell(&record.ram_type),
            yes_no(record.has_wifi),
            yes_no(record.is_active),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ram {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub brand: String,
    pub model: String,
    pub slug: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default, rename = "capacityGB")]
    pub capacity_gb: Option<u32>,
    #[serde(default, rename = "speedMHz")]
    pub speed_mhz: Option<u32>,
    #[serde(default)]
    pub sticks: Option<u32>,
    #[serde(default)]
    pub latency: Option<String>,
    #[serde(default = "active_default")]
    pub is_active: bool,
}

static RAM_SCHEMA: FormSchema = FormSchema {
    fields: &[
        FieldSpec::text("brand").required(),
        FieldSpec::text("model").required(),
        PART_SLUG,
        FieldSpec::choice("type", RAM_TYPES),
        FieldSpec::integer("capacityGB"),
        FieldSpec::integer("speedMHz"),
        FieldSpec::integer("sticks").default("2"),
        FieldSpec::text("latency"),
        FieldSpec::flag("isActive").default("true"),
    ],
    rows: None,
};

pub struct RamResource;

impl Resource for RamResource {
    type Record = Ram;

    const NAME: &'static str = "ram";
    const LIST_PATH: &'static str = "/pcbuilder/rams";
    const WRITE_PATH: &'static str = "/pcbuilder/admin/rams";
    const KEY_KIND: KeyKind = KeyKind::Slug;
    const FILTERS: &'static [FilterKey] = &[FilterKey::Brand];

    fn key(record: &Ram) -> ResourceKey {
        ResourceKey::Slug(record.slug.clone())
    }

    fn label(record: &Ram) -> String {
        format!("{} {}", record.brand, record.model)
    }

    fn facet(record: &Ram, key: FilterKey) -> Option<&str> {
        brand_facet(&record.brand, key)
    }

    fn schema() -> &'static FormSchema {
        &RAM_SCHEMA
    }

    fn columns() -> &'static [&'static str] {
        &["Brand", "Model", "Type", "Capacity", "Speed", "Sticks", "Active"]
    }

    fn cells(record: &Ram) -> Vec<String> {
        vec![
            record.brand.clone(),
            record.model.clone(),
            cell(&record.kind),
            record
                .capacity_gb
                .map(|gb| format!("{} GB", gb))
                .unwrap_or_else(|| "-".to_string()),
            cell(&record.speed_mhz),
            cell(&record.sticks),
            yes_no(record.is_active),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Storage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub brand: String,
    pub model: String,
    pub slug: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub interface: Option<String>,
    #[serde(default, rename = "capacityGB")]
    pub capacity_gb: Option<u32>,
    #[serde(default, rename = "readSpeedMBs")]
    pub read_speed_mbs: Option<u32>,
    #[serde(default, rename = "writeSpeedMBs")]
    pub write_speed_mbs: Option<u32>,
    #[serde(default = "active_default")]
    pub is_active: bool,
}

static STORAGE_SCHEMA: FormSchema = FormSchema {
    fields: &[
        FieldSpec::text("brand").required(),
        FieldSpec::text("model").required(),
        PART_SLUG,
        FieldSpec::choice("type", STORAGE_TYPES),
        FieldSpec::choice("interface", STORAGE_INTERFACES),
        FieldSpec::integer("capacityGB"),
        FieldSpec::integer("readSpeedMBs"),
        FieldSpec::integer("writeSpeedMBs"),
        FieldSpec::flag("isActive").default("true"),
    ],
    rows: None,
};

pub struct StorageResource;

impl Resource for StorageResource {
    type Record = Storage;

    const NAME: &'static str = "storage";
    const LIST_PATH: &'static str = "/pcbuilder/storages";
    const WRITE_PATH: &'static str = "/pcbuilder/admin/storages";
    const KEY_KIND: KeyKind = KeyKind::Slug;
    const FILTERS: &'static [FilterKey] = &[FilterKey::Brand];

    fn key(record: &Storage) -> ResourceKey {
        ResourceKey::Slug(record.slug.clone())
    }

    fn label(record: &Storage) -> String {
        format!("{} {}", record.brand, record.model)
    }

    fn facet(record: &Storage, key: FilterKey) -> Option<&str> {
        brand_facet(&record.brand, key)
    }

    fn schema() -> &'static FormSchema {
        &STORAGE_SCHEMA
    }

    fn columns() -> &'static [&'static str] {
        &["Brand", "Model", "Type", "Interface", "Capacity", "Read MB/s", "Active"]
    }

    fn cells(record: &Storage) -> Vec<String> {
        vec![
            record.brand.clone(),
            record.model.clone(),
            cell(&record.kind),
            cell(&record.interface),
            record
                .capacity_gb
                .map(|gb| format!("{} GB", gb))
                .unwrap_or_else(|| "-".to_string()),
            cell(&record.read_speed_mbs),
            yes_no(record.is_active),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Psu {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub brand: String,
    pub model: String,
    pub slug: String,
    #[serde(default)]
    pub wattage: Option<u32>,
    #[serde(default)]
    pub efficiency: Option<String>,
    #[serde(default)]
    pub modular: Option<String>,
    #[serde(default)]
    pub form_factor: Option<String>,
    #[serde(default = "active_default")]
    pub is_active: bool,
}

static PSU_SCHEMA: FormSchema = FormSchema {
    fields: &[
        FieldSpec::text("brand").required(),
        FieldSpec::text("model").required(),
        PART_SLUG,
        FieldSpec::integer("wattage"),
        FieldSpec::choice("efficiency", EFFICIENCIES),
        FieldSpec::choice("modular", MODULARITY),
        FieldSpec::choice("formFactor", PSU_FORM_FACTORS).default("ATX"),
        FieldSpec::flag("isActive").default("true"),
    ],
    rows: None,
};

pub struct PsuResource;

impl Resource for PsuResource {
    type Record = Psu;

    const NAME: &'static str = "psu";
    const LIST_PATH: &'static str = "/pcbuilder/psus";
    const WRITE_PATH: &'static str = "/pcbuilder/admin/psus";
    const KEY_KIND: KeyKind = KeyKind::Slug;
    const FILTERS: &'static [FilterKey] = &[FilterKey::Brand];

    fn key(record: &Psu) -> ResourceKey {
        ResourceKey::Slug(record.slug.clone())
    }

    fn label(record: &Psu) -> String {
        format!("{} {}", record.brand, record.model)
    }

    fn facet(record: &Psu, key: FilterKey) -> Option<&str> {
        brand_facet(&record.brand, key)
    }

    fn schema() -> &'static FormSchema {
        &PSU_SCHEMA
    }

    fn columns() -> &'static [&'static str] {
        &["Brand", "Model", "Wattage", "Efficiency", "Modular", "Form", "Active"]
    }

    fn cells(record: &Psu) -> Vec<String> {
        vec![
            record.brand.clone(),
            record.model.clone(),
            record
                .wattage
                .map(|w| format!("{} W", w))
                .unwrap_or_else(|| "-".to_string()),
            cell(&record.efficiency),
            cell(&record.modular),
            cell(&record.form_factor),
            yes_no(record.is_active),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PcCase {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub brand: String,
    pub model: String,
    pub slug: String,
    #[serde(default)]
    pub form_factor: Option<String>,
    #[serde(default, rename = "maxGpuLengthMM")]
    pub max_gpu_length_mm: Option<u32>,
    #[serde(default, rename = "maxCoolerHeightMM")]
    pub max_cooler_height_mm: Option<u32>,
    #[serde(default)]
    pub drive_bays25: Option<u32>,
    #[serde(default)]
    pub drive_bays35: Option<u32>,
    #[serde(default = "active_default")]
    pub is_active: bool,
}

static CASE_SCHEMA: FormSchema = FormSchema {
    fields: &[
        FieldSpec::text("brand").required(),
        FieldSpec::text("model").required(),
        PART_SLUG,
        FieldSpec::choice("formFactor", CASE_FORM_FACTORS),
        FieldSpec::integer("maxGpuLengthMM"),
        FieldSpec::integer("maxCoolerHeightMM"),
        FieldSpec::integer("driveBays25"),
        FieldSpec::integer("driveBays35"),
        FieldSpec::flag("isActive").default("true"),
    ],
    rows: None,
};

pub struct PcCaseResource;

impl Resource for PcCaseResource {
    type Record = PcCase;

    const NAME: &'static str = "case";
    const LIST_PATH: &'static str = "/pcbuilder/cases";
    const WRITE_PATH: &'static str = "/pcbuilder/admin/cases";
    const KEY_KIND: KeyKind = KeyKind::Slug;
    const FILTERS: &'static [FilterKey] = &[FilterKey::Brand];

    fn key(record: &PcCase) -> ResourceKey {
        ResourceKey::Slug(record.slug.clone())
    }

    fn label(record: &PcCase) -> String {
        format!("{} {}", record.brand, record.model)
    }

    fn facet(record: &PcCase, key: FilterKey) -> Option<&str> {
        brand_facet(&record.brand, key)
    }

    fn schema() -> &'static FormSchema {
        &CASE_SCHEMA
    }

    fn columns() -> &'static [&'static str] {
        &["Brand", "Model", "Form", "Max GPU mm", "Max Cooler mm", "Active"]
    }

    fn cells(record: &PcCase) -> Vec<String> {
        vec![
            record.brand.clone(),
            record.model.clone(),
            cell(&record.form_factor),
            cell(&record.max_gpu_length_mm),
            cell(&record.max_cooler_height_mm),
            yes_no(record.is_active),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cooler {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub brand: String,
    pub model: String,
    pub slug: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default, rename = "maxTDP")]
    pub max_tdp: Option<u32>,
    #[serde(default, rename = "heightMM")]
    pub height_mm: Option<u32>,
    #[serde(default)]
    pub sockets: Vec<String>,
    #[serde(default = "active_default")]
    pub is_active: bool,
}

static COOLER_SCHEMA: FormSchema = FormSchema {
    fields: &[
        FieldSpec::text("brand").required(),
        FieldSpec::text("model").required(),
        PART_SLUG,
        FieldSpec::choice("type", COOLER_TYPES),
        FieldSpec::integer("maxTDP"),
        FieldSpec::integer("heightMM"),
        FieldSpec::list("sockets"),
        FieldSpec::flag("isActive").default("true"),
    ],
    rows: None,
};

pub struct CoolerResource;

impl Resource for CoolerResource {
    type Record = Cooler;

    const NAME: &'static str = "cooler";
    const LIST_PATH: &'static str = "/pcbuilder/coolers";
    const WRITE_PATH: &'static str = "/pcbuilder/admin/coolers";
    const KEY_KIND: KeyKind = KeyKind::Slug;
    const FILTERS: &'static [FilterKey] = &[FilterKey::Brand];

    fn key(record: &Cooler) -> ResourceKey {
        ResourceKey::Slug(record.slug.clone())
    }

    fn label(record: &Cooler) -> String {
        format!("{} {}", record.brand, record.model)
    }

    fn facet(record: &Cooler, key: FilterKey) -> Option<&str> {
        brand_facet(&record.brand, key)
    }

    fn schema() -> &'static FormSchema {
        &COOLER_SCHEMA
    }

    fn columns() -> &'static [&'static str] {
        &["Brand", "Model", "Type", "Max TDP", "Sockets", "Active"]
    }

    fn cells(record: &Cooler) -> Vec<String> {
        vec![
            record.brand.clone(),
            record.model.clone(),
            cell(&record.kind),
            cell(&record.max_tdp),
            record.sockets.join(", "),
            yes_no(record.is_active),
        ]
    }
}
