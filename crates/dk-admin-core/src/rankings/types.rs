use serde::{Deserialize, Serialize};

/// Which catalog a ranking board orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankingTarget {
    Gpu,
    Cpu,
}

impl RankingTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            RankingTarget::Gpu => "gpu",
            RankingTarget::Cpu => "cpu",
        }
    }

    /// Field naming the ranked entity in write payloads.
    pub fn id_field(&self) -> &'static str {
        match self {
            RankingTarget::Gpu => "gpuId",
            RankingTarget::Cpu => "cpuId",
        }
    }

    pub fn base_path(&self) -> String {
        format!("/admin/rankings/{}", self.as_str())
    }
}

impl std::fmt::Display for RankingTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RankingTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gpu" => Ok(RankingTarget::Gpu),
            "cpu" => Ok(RankingTarget::Cpu),
            _ => Err(format!("Unknown ranking target '{}'. Use gpu or cpu", s)),
        }
    }
}

/// Independent rank orderings within one target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RankingCategory {
    #[default]
    General,
    Gaming,
    Workstation,
    Productivity,
}

impl RankingCategory {
    pub const ALL: [RankingCategory; 4] = [
        RankingCategory::General,
        RankingCategory::Gaming,
        RankingCategory::Workstation,
        RankingCategory::Productivity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RankingCategory::General => "general",
            RankingCategory::Gaming => "gaming",
            RankingCategory::Workstation => "workstation",
            RankingCategory::Productivity => "productivity",
        }
    }
}

impl std::fmt::Display for RankingCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RankingCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RankingCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!(
                    "Unknown ranking category '{}'. Use general, gaming, workstation or productivity",
                    s
                )
            })
    }
}

/// A catalog item as shown next to a ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedItem {
    pub id: i64,
    pub brand: String,
    pub model: String,
    #[serde(default)]
    pub slug: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawRankingEntry")]
pub struct RankingEntry {
    /// Ranking row id, used for removal.
    pub id: i64,
    /// Id of the ranked GPU or CPU.
    pub entity_id: i64,
    pub rank: i64,
    pub score: f64,
    pub category: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub item: Option<RankedItem>,
}

/// Wire shape of a ranking row. GPU boards send `gpuId`/`gpu`, CPU boards
/// `cpuId`/`cpu`; both may be present, and the GPU pair wins.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRankingEntry {
    id: i64,
    #[serde(default)]
    gpu_id: Option<i64>,
    #[serde(default)]
    cpu_id: Option<i64>,
    #[serde(default)]
    entity_id: Option<i64>,
    rank: i64,
    score: f64,
    category: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    is_active: bool,
    #[serde(default)]
    gpu: Option<RankedItem>,
    #[serde(default)]
    cpu: Option<RankedItem>,
    #[serde(default)]
    item: Option<RankedItem>,
}

impl TryFrom<RawRankingEntry> for RankingEntry {
    type Error = String;

    fn try_from(raw: RawRankingEntry) -> Result<Self, Self::Error> {
        let entity_id = raw
            .gpu_id
            .or(raw.cpu_id)
            .or(raw.entity_id)
            .ok_or_else(|| format!("ranking {} has no gpuId or cpuId", raw.id))?;
        Ok(Self {
            id: raw.id,
            entity_id,
            rank: raw.rank,
            score: raw.score,
            category: raw.category,
            description: raw.description,
            is_active: raw.is_active,
            item: raw.gpu.or(raw.cpu).or(raw.item),
        })
    }
}

impl RankingEntry {
    pub fn label(&self) -> String {
        match &self.item {
            Some(item) => format!("{} {}", item.brand, item.model),
            None => format!("#{}", self.entity_id),
        }
    }
}

/// Input for adding an entity to a board.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewRanking {
    pub entity_id: i64,
    pub score: f64,
    /// Defaults to one past the current last rank.
    pub rank: Option<i64>,
    pub description: Option<String>,
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entry_accepts_either_id_field() {
        let gpu: RankingEntry = serde_json::from_value(json!({
            "id": 1, "gpuId": 10, "rank": 1, "score": 98.5, "category": "gaming",
            "isActive": true, "gpu": {"id": 10, "brand": "NVIDIA", "model": "RTX 4090"}
        }))
        .unwrap();
        assert_eq!(gpu.entity_id, 10);
        assert_eq!(gpu.label(), "NVIDIA RTX 4090");

        let cpu: RankingEntry = serde_json::from_value(json!({
            "id": 2, "cpuId": 20, "rank": 3, "score": 80, "category": "general"
        }))
        .unwrap();
        assert_eq!(cpu.entity_id, 20);
        assert_eq!(cpu.label(), "#20");
    }

    #[test]
    fn test_entry_with_both_id_fields_decodes() {
        let entry: RankingEntry = serde_json::from_value(json!({
            "id": 5, "gpuId": 10, "cpuId": null, "rank": 1, "score": 90,
            "category": "general", "gpu": {"id": 10, "brand": "AMD", "model": "RX 7900 XTX"},
            "cpu": null
        }))
        .unwrap();
        assert_eq!(entry.entity_id, 10);
        assert_eq!(entry.label(), "AMD RX 7900 XTX");

        let both: RankingEntry = serde_json::from_value(json!({
            "id": 6, "gpuId": 11, "cpuId": 21, "rank": 2, "score": 70, "category": "general"
        }))
        .unwrap();
        assert_eq!(both.entity_id, 11);
    }

    #[test]
    fn test_entry_without_entity_id_rejected() {
        let result = serde_json::from_value::<RankingEntry>(json!({
            "id": 7, "rank": 1, "score": 50, "category": "general"
        }));
        assert!(result.unwrap_err().to_string().contains("no gpuId or cpuId"));
    }

    #[test]
    fn test_category_parse() {
        assert_eq!("Gaming".parse::<RankingCategory>(), Ok(RankingCategory::Gaming));
        assert!("esports".parse::<RankingCategory>().is_err());
        assert_eq!(RankingCategory::default().as_str(), "general");
    }

    #[test]
    fn test_target_paths() {
        assert_eq!(RankingTarget::Cpu.base_path(), "/admin/rankings/cpu");
        assert_eq!(RankingTarget::Gpu.id_field(), "gpuId");
        assert_eq!("GPU".parse::<RankingTarget>(), Ok(RankingTarget::Gpu));
    }
}
