//! Subscription categories and their display descriptors.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed set of groupings used for filtering and analytics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionCategory {
    Streaming,
    Music,
    Productivity,
    Gaming,
    News,
    Fitness,
    Cloud,
    Education,
    #[default]
    Other,
}

/// Presentation hints for a category. Opaque to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryDescriptor {
    pub category: SubscriptionCategory,
    pub label: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
}

const DESCRIPTORS: [CategoryDescriptor; 9] = [
    CategoryDescriptor {
        category: SubscriptionCategory::Streaming,
        label: "Streaming",
        icon: "tv",
        color: "red",
    },
    CategoryDescriptor {
        category: SubscriptionCategory::Music,
        label: "Music",
        icon: "music.note",
        color: "green",
    },
    CategoryDescriptor {
        category: SubscriptionCategory::Productivity,
        label: "Productivity",
        icon: "briefcase",
        color: "purple",
    },
    CategoryDescriptor {
        category: SubscriptionCategory::Gaming,
        label: "Gaming",
        icon: "gamecontroller",
        color: "orange",
    },
    CategoryDescriptor {
        category: SubscriptionCategory::News,
        label: "News",
        icon: "newspaper",
        color: "gray",
    },
    CategoryDescriptor {
        category: SubscriptionCategory::Fitness,
        label: "Fitness",
        icon: "figure.run",
        color: "pink",
    },
    CategoryDescriptor {
        category: SubscriptionCategory::Cloud,
        label: "Cloud Storage",
        icon: "icloud",
        color: "blue",
    },
    CategoryDescriptor {
        category: SubscriptionCategory::Education,
        label: "Education",
        icon: "book",
        color: "indigo",
    },
    CategoryDescriptor {
        category: SubscriptionCategory::Other,
        label: "Other",
        icon: "ellipsis.circle",
        color: "teal",
    },
];

impl SubscriptionCategory {
    /// Every category in declaration order.
    pub const ALL: [SubscriptionCategory; 9] = [
        SubscriptionCategory::Streaming,
        SubscriptionCategory::Music,
        SubscriptionCategory::Productivity,
        SubscriptionCategory::Gaming,
        SubscriptionCategory::News,
        SubscriptionCategory::Fitness,
        SubscriptionCategory::Cloud,
        SubscriptionCategory::Education,
        SubscriptionCategory::Other,
    ];

    pub fn descriptor(self) -> &'static CategoryDescriptor {
        // DESCRIPTORS mirrors ALL index for index.
        &DESCRIPTORS[self as usize]
    }

    pub fn label(self) -> &'static str {
        self.descriptor().label
    }

    /// Accepts either the serialized tag (`cloud`) or the display label (`Cloud Storage`).
    pub fn parse(value: &str) -> Option<Self> {
        let needle = value.trim();
        DESCRIPTORS
            .iter()
            .find(|desc| {
                desc.label.eq_ignore_ascii_case(needle)
                    || format!("{:?}", desc.category).eq_ignore_ascii_case(needle)
            })
            .map(|desc| desc.category)
    }
}

impl fmt::Display for SubscriptionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_table_matches_declaration_order() {
        for category in SubscriptionCategory::ALL {
            assert_eq!(category.descriptor().category, category);
        }
    }

    #[test]
    fn parse_accepts_tag_or_label() {
        assert_eq!(
            SubscriptionCategory::parse("cloud"),
            Some(SubscriptionCategory::Cloud)
        );
        assert_eq!(
            SubscriptionCategory::parse("cloud storage"),
            Some(SubscriptionCategory::Cloud)
        );
        assert_eq!(SubscriptionCategory::parse("groceries"), None);
    }
}
