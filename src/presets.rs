use crate::parameter::Parameter;
use crate::types::Stat;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

#[derive(Debug, Clone, Copy, EnumIter, EnumString, Display, PartialEq, Eq, Hash)]
#[strum(serialize_all = "snake_case")]
pub enum KnownPreset {
    Balanced,
    MaxFood,
    MaxShield,
    MaxTrade,
    MaxGold,
    MaxScience,
    Celebrate,
    Starve,
}

impl KnownPreset {
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Balanced => "Every surplus at least zero, all stats weighted equally",
            Self::MaxFood => "Grow as fast as possible",
            Self::MaxShield => "Maximise production",
            Self::MaxTrade => "Maximise raw trade",
            Self::MaxGold => "Maximise tax income",
            Self::MaxScience => "Maximise research",
            Self::Celebrate => "Keep the city celebrating with a positive food surplus",
            Self::Starve => "Allow shrinking, favour shields and science",
        }
    }

    pub fn parameter(&self) -> Parameter {
        let mut param = Parameter::default();
        match self {
            Self::Balanced => {}
            Self::MaxFood => {
                param.set_factor(Stat::Food, 10);
            }
            Self::MaxShield => {
                param.set_factor(Stat::Shield, 10);
            }
            Self::MaxTrade => {
                param.set_factor(Stat::Trade, 10);
            }
            Self::MaxGold => {
                param.set_factor(Stat::Gold, 10);
            }
            Self::MaxScience => {
                param.set_factor(Stat::Science, 10);
            }
            Self::Celebrate => {
                param.set_minimal(Stat::Food, 1);
                param.happy_factor = 20;
                param.require_happy = true;
            }
            Self::Starve => {
                param
                    .set_minimal(Stat::Food, -20)
                    .set_factor(Stat::Food, 0)
                    .set_factor(Stat::Shield, 4)
                    .set_factor(Stat::Science, 4);
            }
        }
        param
    }
}

pub fn get_all_presets() -> Vec<(KnownPreset, Parameter)> {
    KnownPreset::iter().map(|p| (p, p.parameter())).collect()
}
