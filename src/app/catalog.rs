//! 图标与分类对照表
//!
//! 记录落盘时只保存图标名称，读取时通过这里的表还原。

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// 卡片图标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Icon {
    BookOpen,
    Heart,
    Home,
    Shield,
    Smartphone,
    Leaf,
    Building2,
    Zap,
    Store,
}

const ICONS: [Icon; 9] = [
    Icon::BookOpen,
    Icon::Heart,
    Icon::Home,
    Icon::Shield,
    Icon::Smartphone,
    Icon::Leaf,
    Icon::Building2,
    Icon::Zap,
    Icon::Store,
];

impl Icon {
    pub fn name(self) -> &'static str {
        match self {
            Icon::BookOpen => "BookOpen",
            Icon::Heart => "Heart",
            Icon::Home => "Home",
            Icon::Shield => "Shield",
            Icon::Smartphone => "Smartphone",
            Icon::Leaf => "Leaf",
            Icon::Building2 => "Building2",
            Icon::Zap => "Zap",
            Icon::Store => "Store",
        }
    }

    pub fn from_name(name: &str) -> Option<Icon> {
        ICONS.iter().copied().find(|icon| icon.name() == name)
    }

    /// 按名称还原图标，未知名称回退到 `fallback`
    pub fn resolve(name: Option<&str>, fallback: Icon) -> Icon {
        name.and_then(Icon::from_name).unwrap_or(fallback)
    }
}

/// 条目种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Donor,
    Investor,
}

impl ItemKind {
    pub fn default_icon(self) -> Icon {
        match self {
            ItemKind::Donor => Icon::BookOpen,
            ItemKind::Investor => Icon::Smartphone,
        }
    }
}

/// 影响力等级，兼容种子数据的首字母大写和表单提交的小写写法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImpactLevel {
    #[serde(alias = "low")]
    Low,
    #[serde(alias = "medium")]
    Medium,
    #[serde(alias = "high")]
    High,
    #[serde(alias = "critical")]
    Critical,
}

/// 风险等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    #[serde(alias = "low")]
    Low,
    #[serde(alias = "medium")]
    Medium,
    #[serde(alias = "high")]
    High,
}

/// 以名称形式序列化图标
pub fn serialize_icon<S: Serializer>(icon: &Icon, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(icon.name())
}

/// 反序列化捐赠项目的图标名，未知名称不报错
pub fn deserialize_donor_icon<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Icon, D::Error> {
    let name = Option::<String>::deserialize(deserializer)?;
    Ok(Icon::resolve(name.as_deref(), ItemKind::Donor.default_icon()))
}

/// 反序列化投资项目的图标名
pub fn deserialize_investor_icon<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Icon, D::Error> {
    let name = Option::<String>::deserialize(deserializer)?;
    Ok(Icon::resolve(name.as_deref(), ItemKind::Investor.default_icon()))
}

pub fn default_donor_icon() -> Icon {
    ItemKind::Donor.default_icon()
}

pub fn default_investor_icon() -> Icon {
    ItemKind::Investor.default_icon()
}

/// 分类到图标，大小写不敏感，空格视同连字符
pub fn category_icon(kind: ItemKind, category: &str) -> Icon {
    let normalized = category.trim().to_lowercase().replace(' ', "-");
    match (kind, normalized.as_str()) {
        (ItemKind::Donor, "education") => Icon::BookOpen,
        (ItemKind::Donor, "health") => Icon::Heart,
        (ItemKind::Donor, "infrastructure") => Icon::Home,
        (ItemKind::Donor, "safety") => Icon::Shield,
        (ItemKind::Investor, "technology") => Icon::Smartphone,
        (ItemKind::Investor, "clean-energy") => Icon::Leaf,
        (ItemKind::Investor, "real-estate") => Icon::Building2,
        (ItemKind::Investor, "cryptocurrency") => Icon::Zap,
        _ => Icon::Store,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_table() {
        for icon in ICONS {
            assert_eq!(Icon::from_name(icon.name()), Some(icon));
        }
    }

    #[test]
    fn unknown_names_fall_back_per_kind() {
        assert_eq!(
            Icon::resolve(Some("Rocket"), ItemKind::Donor.default_icon()),
            Icon::BookOpen
        );
        assert_eq!(
            Icon::resolve(None, ItemKind::Investor.default_icon()),
            Icon::Smartphone
        );
        assert_eq!(Icon::resolve(Some("Leaf"), Icon::BookOpen), Icon::Leaf);
    }

    #[test]
    fn categories_map_to_icons() {
        assert_eq!(category_icon(ItemKind::Donor, "health"), Icon::Heart);
        assert_eq!(category_icon(ItemKind::Investor, "Clean Energy"), Icon::Leaf);
        assert_eq!(category_icon(ItemKind::Investor, "real-estate"), Icon::Building2);
        assert_eq!(category_icon(ItemKind::Donor, "shopify"), Icon::Store);
        // 投资分类不会出现在捐赠表里
        assert_eq!(category_icon(ItemKind::Donor, "technology"), Icon::Store);
    }

    #[test]
    fn levels_accept_both_spellings() {
        let high: ImpactLevel = serde_json::from_str("\"high\"").unwrap();
        let seeded: ImpactLevel = serde_json::from_str("\"High\"").unwrap();
        assert_eq!(high, seeded);
        assert_eq!(serde_json::to_string(&RiskLevel::Low).unwrap(), "\"Low\"");
    }
}
