//! Comparison catalog: CPUs, GPUs and laptops.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::client::{ApiClient, Query, RequestError, Transport};
use crate::resources::schema::{FieldKind, FieldSpec, FormSchema, RowColumn, RowSpec};
use crate::resources::{FilterKey, KeyKind, Resource, ResourceKey, cell, limit_query, yes_no};

pub const CPU_BRANDS: &[&str] = &["AMD", "Intel"];
pub const GPU_BRANDS: &[&str] = &["NVIDIA", "AMD"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuBenchmarks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passmark: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cinebench_s: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cinebench_m: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cpu {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub brand: String,
    pub model: String,
    pub slug: String,
    #[serde(default)]
    pub cores: Option<u32>,
    #[serde(default)]
    pub threads: Option<u32>,
    #[serde(default, rename = "baseClockMHz")]
    pub base_clock_mhz: Option<u32>,
    #[serde(default, rename = "boostClockMHz")]
    pub boost_clock_mhz: Option<u32>,
    #[serde(default)]
    pub tdp: Option<u32>,
    #[serde(default)]
    pub lithography_nm: Option<u32>,
    #[serde(default)]
    pub socket: Option<String>,
    #[serde(default)]
    pub release_year: Option<u32>,
    #[serde(default)]
    pub benchmarks: Option<CpuBenchmarks>,
}

static CPU_SCHEMA: FormSchema = FormSchema {
    fields: &[
        FieldSpec::choice("brand", CPU_BRANDS).required().default("AMD"),
        FieldSpec::text("model").required(),
        FieldSpec::slug(),
        FieldSpec::integer("cores"),
        FieldSpec::integer("threads"),
        FieldSpec::integer("baseClockMHz"),
        FieldSpec::integer("boostClockMHz"),
        FieldSpec::integer("tdp"),
        FieldSpec::integer("lithographyNm"),
        FieldSpec::text("socket"),
        FieldSpec::integer("releaseYear"),
        FieldSpec::decimal("benchmarks.passmark"),
        FieldSpec::decimal("benchmarks.cinebenchS"),
        FieldSpec::decimal("benchmarks.cinebenchM"),
    ],
    rows: None,
};

pub struct CpuResource;

impl Resource for CpuResource {
    type Record = Cpu;

    const NAME: &'static str = "cpu";
    const LIST_PATH: &'static str = "/cpus";
    const WRITE_PATH: &'static str = "/admin/cpus";
    const KEY_KIND: KeyKind = KeyKind::Slug;
    const FILTERS: &'static [FilterKey] = &[FilterKey::Brand];
    const SERVER_FILTERS: &'static [FilterKey] = &[FilterKey::Brand];

    fn key(record: &Cpu) -> ResourceKey {
        ResourceKey::Slug(record.slug.clone())
    }

    fn label(record: &Cpu) -> String {
        record.model.clone()
    }

    fn search_text(record: &Cpu) -> String {
        format!("{} {} {}", record.brand, record.model, record.slug)
    }

    fn facet(record: &Cpu, key: FilterKey) -> Option<&str> {
        match key {
            FilterKey::Brand => Some(&record.brand),
            _ => None,
        }
    }

    fn base_query(fetch_limit: u32) -> Query {
        let mut query = limit_query(fetch_limit);
        query.push(("sort".to_string(), "year".to_string()));
        query
    }

    fn schema() -> &'static FormSchema {
        &CPU_SCHEMA
    }

    fn columns() -> &'static [&'static str] {
        &["Brand", "Model", "Slug", "Cores/Threads", "Boost MHz", "Year"]
    }

    fn cells(record: &Cpu) -> Vec<String> {
        vec![
            record.brand.clone(),
            record.model.clone(),
            record.slug.clone(),
            format!("{}/{}", cell(&record.cores), cell(&record.threads)),
            cell(&record.boost_clock_mhz),
            cell(&record.release_year),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GpuBenchmarks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_spy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passmark: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FpsByResolution {
    #[serde(default, rename = "1080p", skip_serializing_if = "Option::is_none")]
    pub p1080: Option<f64>,
    #[serde(default, rename = "1440p", skip_serializing_if = "Option::is_none")]
    pub p1440: Option<f64>,
    #[serde(default, rename = "4k", skip_serializing_if = "Option::is_none")]
    pub p4k: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GpuFps {
    #[serde(default)]
    pub games: BTreeMap<String, FpsByResolution>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gpu {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub brand: String,
    pub model: String,
    pub slug: String,
    #[serde(default)]
    pub cuda_cores: Option<u32>,
    #[serde(default)]
    pub stream_processors: Option<u32>,
    #[serde(default)]
    pub base_clock: Option<u32>,
    #[serde(default)]
    pub boost_clock: Option<u32>,
    #[serde(rename = "vramGB")]
    pub vram_gb: u32,
    pub vram_type: String,
    #[serde(default)]
    pub tdp: Option<u32>,
    #[serde(default)]
    pub pcie: Option<String>,
    #[serde(default)]
    pub outputs: Option<Vec<String>>,
    #[serde(default)]
    pub cooling: Option<String>,
    #[serde(default)]
    pub release_year: Option<u32>,
    #[serde(default)]
    pub directx: Option<String>,
    #[serde(default)]
    pub benchmarks: Option<GpuBenchmarks>,
    #[serde(default)]
    pub fps: Option<GpuFps>,
}

static GPU_SCHEMA: FormSchema = FormSchema {
    fields: &[
        FieldSpec::choice("brand", GPU_BRANDS).required().default("NVIDIA"),
        FieldSpec::text("model").required(),
        FieldSpec::slug(),
        FieldSpec::integer("cudaCores"),
        FieldSpec::integer("streamProcessors"),
        FieldSpec::integer("baseClock"),
        FieldSpec::integer("boostClock"),
        FieldSpec::integer("vramGB").required().default("8"),
        FieldSpec::text("vramType").required().default("GDDR6"),
        FieldSpec::integer("tdp"),
        FieldSpec::text("pcie"),
        FieldSpec::list("outputs"),
        FieldSpec::text("cooling"),
        FieldSpec::integer("releaseYear"),
        FieldSpec::text("directx"),
        FieldSpec::decimal("benchmarks.timeSpy"),
        FieldSpec::decimal("benchmarks.passmark"),
    ],
    rows: Some(RowSpec {
        target: "fps.games",
        key_column: "name",
        columns: &[
            RowColumn {
                name: "1080p",
                payload_key: "1080p",
                kind: FieldKind::Decimal,
            },
            RowColumn {
                name: "1440p",
                payload_key: "1440p",
                kind: FieldKind::Decimal,
            },
            RowColumn {
                name: "4k",
                payload_key: "4k",
                kind: FieldKind::Decimal,
            },
        ],
        default_rows: &["Cyberpunk 2077", "Red Dead Redemption 2", "Fortnite"],
    }),
};

pub struct GpuResource;

impl Resource for GpuResource {
    type Record = Gpu;

    const NAME: &'static str = "gpu";
    const LIST_PATH: &'static str = "/gpus";
    const WRITE_PATH: &'static str = "/admin/gpus";
    const KEY_KIND: KeyKind = KeyKind::Slug;
    const FILTERS: &'static [FilterKey] = &[FilterKey::Brand];
    const SERVER_FILTERS: &'static [FilterKey] = &[FilterKey::Brand];

    fn key(record: &Gpu) -> ResourceKey {
        ResourceKey::Slug(record.slug.clone())
    }

    fn label(record: &Gpu) -> String {
        record.model.clone()
    }

    fn search_text(record: &Gpu) -> String {
        format!("{} {} {}", record.brand, record.model, record.slug)
    }

    fn facet(record: &Gpu, key: FilterKey) -> Option<&str> {
        match key {
            FilterKey::Brand => Some(&record.brand),
            _ => None,
        }
    }

    fn base_query(fetch_limit: u32) -> Query {
        let mut query = limit_query(fetch_limit);
        query.push(("sort".to_string(), "year".to_string()));
        query
    }

    fn schema() -> &'static FormSchema {
        &GPU_SCHEMA
    }

    fn columns() -> &'static [&'static str] {
        &["Brand", "Model", "Slug", "VRAM", "TDP", "Year"]
    }

    fn cells(record: &Gpu) -> Vec<String> {
        vec![
            record.brand.clone(),
            record.model.clone(),
            record.slug.clone(),
            format!("{} GB {}", record.vram_gb, record.vram_type),
            cell(&record.tdp),
            cell(&record.release_year),
        ]
    }
}

/// A catalog reference embedded in a laptop (`{id, model}`), also the shape
/// of the laptop form's GPU and CPU options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaptopRef {
    pub id: i64,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Laptop {
    pub id: i64,
    pub brand: String,
    #[serde(default)]
    pub series: Option<String>,
    pub model: String,
    pub slug: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub screen_size: Option<String>,
    #[serde(default)]
    pub screen_res: Option<String>,
    #[serde(default)]
    pub screen_hz: Option<u32>,
    #[serde(default)]
    pub panel_type: Option<String>,
    #[serde(default)]
    pub ram: Option<String>,
    #[serde(default)]
    pub storage: Option<String>,
    #[serde(default)]
    pub gpu_watt: Option<u32>,
    #[serde(default)]
    pub mux_switch: bool,
    pub gpu: LaptopRef,
    pub cpu: LaptopRef,
}

static LAPTOP_SCHEMA: FormSchema = FormSchema {
    fields: &[
        FieldSpec::text("brand").required(),
        FieldSpec::text("series"),
        FieldSpec::text("model").required(),
        FieldSpec::text("slug").required(),
        FieldSpec::decimal("price"),
        FieldSpec::text("screenSize"),
        FieldSpec::text("screenRes"),
        FieldSpec::integer("screenHz"),
        FieldSpec::text("panelType"),
        FieldSpec::text("ram"),
        FieldSpec::text("storage"),
        FieldSpec::integer("gpuId").required().source("gpu.id"),
        FieldSpec::integer("cpuId").required().source("cpu.id"),
        FieldSpec::integer("gpuWatt"),
        FieldSpec::flag("muxSwitch").default("false"),
    ],
    rows: None,
};

pub struct LaptopResource;

impl Resource for LaptopResource {
    type Record = Laptop;

    const NAME: &'static str = "laptop";
    const LIST_PATH: &'static str = "/admin/laptops";
    const WRITE_PATH: &'static str = "/admin/laptops";
    const KEY_KIND: KeyKind = KeyKind::Id;
    const FILTERS: &'static [FilterKey] = &[FilterKey::Brand];

    fn key(record: &Laptop) -> ResourceKey {
        ResourceKey::Id(record.id)
    }

    fn label(record: &Laptop) -> String {
        format!("{} {}", record.brand, record.model)
    }

    fn search_text(record: &Laptop) -> String {
        format!(
            "{} {} {} {}",
            record.brand,
            record.series.as_deref().unwrap_or_default(),
            record.model,
            record.slug
        )
    }

    fn facet(record: &Laptop, key: FilterKey) -> Option<&str> {
        match key {
            FilterKey::Brand => Some(&record.brand),
            _ => None,
        }
    }

    fn schema() -> &'static FormSchema {
        &LAPTOP_SCHEMA
    }

    fn columns() -> &'static [&'static str] {
        &["ID", "Brand", "Model", "GPU", "CPU", "Price", "MUX"]
    }

    fn cells(record: &Laptop) -> Vec<String> {
        vec![
            record.id.to_string(),
            record.brand.clone(),
            record.model.clone(),
            record.gpu.model.clone(),
            record.cpu.model.clone(),
            cell(&record.price),
            yes_no(record.mux_switch),
        ]
    }
}

/// GPUs and CPUs a laptop can reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LaptopFormOptions {
    #[serde(default)]
    pub gpus: Vec<LaptopRef>,
    #[serde(default)]
    pub cpus: Vec<LaptopRef>,
}

pub async fn fetch_laptop_form_options<T: Transport>(
    client: &ApiClient<T>,
) -> Result<LaptopFormOptions, RequestError> {
    let options: LaptopFormOptions = client
        .get("/admin/laptops/form-options", Vec::new())
        .await?;

    info!(
        event = "core.laptop.form_options_loaded",
        gpus = options.gpus.len(),
        cpus = options.cpus.len()
    );

    Ok(options)
}
