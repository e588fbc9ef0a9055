//! Parameter names.
//!
//! Names embed the location of what they control so that a parameter file
//! can be read without the registry. Indices are 0-based, as in the model
//! records. Names are lowercase.
//!
//! | kind | name |
//! |------|------|
//! | zpc | `<name>_l<LL>_z<ZZ>` |
//! | zpc, lite | `<name>_<L>_<Z>` |
//! | pumping | `<name>_l<LL>_i<III>_j<JJJ>` |
//! | soil | `<name>_<prop>_z<ZZ>` |

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{PestError, PestResult};

static ZPC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(.+)_l(\d+)_z(\d+)$").unwrap());
static ZPC_LITE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(.+)_(\d+)_(\d+)$").unwrap());
static PUMP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+)_l(\d+)_i(\d+)_j(\d+)$").unwrap());
static SOIL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([^_]+)_(.+)_z(\d+)$").unwrap());

/// What a parameter name points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedName {
    Zpc {
        name: String,
        layer: usize,
        zone: usize,
    },
    Pump {
        name: String,
        layer: usize,
        i: usize,
        j: usize,
    },
    Soil {
        name: String,
        property: String,
        zone: usize,
    },
}

/// Check a user-given base name: non-empty, ASCII alphanumeric or `_`.
///
/// Soil names are split on their first `_`, so `soil_names` forbids it.
pub fn check_base_name(name: &str, soil_names: bool) -> PestResult<String> {
    let invalid = |reason: &str| PestError::InvalidName {
        name: name.to_string(),
        reason: reason.to_string(),
    };
    if name.is_empty() {
        return Err(invalid("empty name"));
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(invalid("only letters, digits and '_' are allowed"));
    }
    if soil_names && name.contains('_') {
        return Err(invalid("soil parameter names cannot contain '_'"));
    }
    Ok(name.to_ascii_lowercase())
}

pub fn zpc_name(name: &str, layer: usize, zone: usize, lite: bool) -> String {
    if lite {
        format!("{name}_{layer}_{zone}").to_ascii_lowercase()
    } else {
        format!("{name}_l{layer:02}_z{zone:02}").to_ascii_lowercase()
    }
}

pub fn pump_name(name: &str, layer: usize, i: usize, j: usize) -> String {
    format!("{name}_l{layer:02}_i{i:03}_j{j:03}").to_ascii_lowercase()
}

pub fn soil_name(name: &str, property: &str, zone: usize) -> String {
    format!("{name}_{property}_z{zone:02}").to_ascii_lowercase()
}

fn num(caps: &regex::Captures<'_>, group: usize) -> Option<usize> {
    caps[group].parse().ok()
}

/// Recover the embedded indices of a parameter name.
///
/// Pumping names are tried first since they also end like a zpc name.
pub fn parse_name(parnme: &str) -> Option<ParsedName> {
    let parnme = parnme.to_ascii_lowercase();
    if let Some(c) = PUMP.captures(&parnme) {
        return Some(ParsedName::Pump {
            name: c[1].to_string(),
            layer: num(&c, 2)?,
            i: num(&c, 3)?,
            j: num(&c, 4)?,
        });
    }
    if let Some(c) = ZPC.captures(&parnme) {
        return Some(ParsedName::Zpc {
            name: c[1].to_string(),
            layer: num(&c, 2)?,
            zone: num(&c, 3)?,
        });
    }
    if let Some(c) = SOIL.captures(&parnme) {
        return Some(ParsedName::Soil {
            name: c[1].to_string(),
            property: c[2].to_string(),
            zone: num(&c, 3)?,
        });
    }
    let c = ZPC_LITE.captures(&parnme)?;
    Some(ParsedName::Zpc {
        name: c[1].to_string(),
        layer: num(&c, 2)?,
        zone: num(&c, 3)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formats() {
        assert_eq!(zpc_name("Kepon", 0, 3, false), "kepon_l00_z03");
        assert_eq!(zpc_name("kepon", 1, 12, true), "kepon_1_12");
        assert_eq!(pump_name("qriv", 2, 45, 7), "qriv_l02_i045_j007");
        assert_eq!(soil_name("soil", "CAP_SOL_PROGR", 1), "soil_cap_sol_progr_z01");
    }

    #[test]
    fn test_parse_back() {
        assert_eq!(
            parse_name("permh_l01_z02"),
            Some(ParsedName::Zpc {
                name: "permh".into(),
                layer: 1,
                zone: 2
            })
        );
        assert_eq!(
            parse_name("permh_1_2"),
            Some(ParsedName::Zpc {
                name: "permh".into(),
                layer: 1,
                zone: 2
            })
        );
        assert_eq!(
            parse_name(&pump_name("q_wells", 0, 10, 20)),
            Some(ParsedName::Pump {
                name: "q_wells".into(),
                layer: 0,
                i: 10,
                j: 20
            })
        );
        assert_eq!(
            parse_name("soil_cap_sol_progr_z01"),
            Some(ParsedName::Soil {
                name: "soil".into(),
                property: "cap_sol_progr".into(),
                zone: 1
            })
        );
        assert_eq!(parse_name("nothing"), None);
    }

    #[test]
    fn test_base_name_checks() {
        assert_eq!(check_base_name("Kepon", false).unwrap(), "kepon");
        assert!(check_base_name("", false).is_err());
        assert!(check_base_name("a b", false).is_err());
        assert!(check_base_name("soil_x", true).is_err());
    }
}
