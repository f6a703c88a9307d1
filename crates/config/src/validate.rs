//! Configuration validation engine.
//!
//! Validates TOML configuration files against the known schema, detects
//! unknown/misspelled fields, and flags routing settings that would silently
//! degrade to defaults at runtime.

use std::{
    collections::{HashMap, HashSet},
    path::Path,
};

use deskroute_common::types::{TeamId, TeamKind};

use crate::{
    routing::{normalize_domain, parse_domains},
    schema::{DeskrouteConfig, ParamValue},
};

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Info => write!(f, "info"),
        }
    }
}

/// A single validation diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Category: "syntax", "unknown-field", "type-error", "routing", "teams",
    /// "file-ref"
    pub category: &'static str,
    /// Dotted path, e.g. "routing.internal_team_id"
    pub path: String,
    pub message: String,
}

/// Result of validating a configuration file.
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub diagnostics: Vec<Diagnostic>,
    pub config_path: Option<std::path::PathBuf>,
}

impl ValidationResult {
    /// Returns `true` if any diagnostic is an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Count diagnostics by severity.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }
}

// ── Schema tree for unknown-field detection ─────────────────────────────────

/// Expected shape of the configuration schema.
enum KnownKeys {
    /// A struct with fixed field names.
    Struct(HashMap<&'static str, KnownKeys>),
    /// An array of typed items.
    Array(Box<KnownKeys>),
    /// Scalar value, stop recursion.
    Leaf,
}

/// Build the full schema map mirroring every field in `schema.rs`.
fn build_schema_map() -> KnownKeys {
    use KnownKeys::{Array, Leaf, Struct};

    let user = Struct(HashMap::from([
        ("id", Leaf),
        ("name", Leaf),
        ("email", Leaf),
        ("lang", Leaf),
    ]));

    let team = Struct(HashMap::from([
        ("id", Leaf),
        ("name", Leaf),
        ("symbolic_ref", Leaf),
        ("leader", user),
    ]));

    Struct(HashMap::from([
        (
            "routing",
            Struct(HashMap::from([
                ("internal_domains", Leaf),
                ("internal_team_id", Leaf),
                ("external_team_id", Leaf),
                ("enable_notifications", Leaf),
            ])),
        ),
        ("teams", Array(Box::new(team))),
        (
            "notifications",
            Struct(HashMap::from([
                ("default_lang", Leaf),
                (
                    "template",
                    Struct(HashMap::from([("subject", Leaf), ("body", Leaf)])),
                ),
            ])),
        ),
    ]))
}

// ── Levenshtein distance ────────────────────────────────────────────────────

/// Compute the Levenshtein edit distance between two strings.
fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a.chars().count();
    }

    let mut prev: Vec<usize> = (0..=b_chars.len()).collect();
    let mut curr = vec![0; b_chars.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            curr[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b_chars.len()]
}

/// Closest candidate to `needle` within `max_distance` edits.
fn suggest<'a>(needle: &str, candidates: &[&'a str], max_distance: usize) -> Option<&'a str> {
    candidates
        .iter()
        .map(|&c| (c, levenshtein(needle, c)))
        .filter(|&(_, d)| d > 0 && d <= max_distance)
        .min_by_key(|&(_, d)| d)
        .map(|(c, _)| c)
}

// ── Core validation ─────────────────────────────────────────────────────────

/// Validate a config file at the given path, or discover the default config
/// file location if `path` is `None`.
#[must_use]
pub fn validate(path: Option<&Path>) -> ValidationResult {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => crate::loader::find_config_file(),
    };

    let Some(ref actual_path) = config_path else {
        return ValidationResult {
            diagnostics: vec![Diagnostic {
                severity: Severity::Info,
                category: "file-ref",
                path: String::new(),
                message: "no config file found; using defaults".into(),
            }],
            config_path: None,
        };
    };

    match std::fs::read_to_string(actual_path) {
        Ok(content) => {
            let mut result = validate_toml_str(&crate::env_subst::substitute_env(&content));
            result.config_path = Some(actual_path.clone());
            result
        },
        Err(e) => ValidationResult {
            diagnostics: vec![Diagnostic {
                severity: Severity::Error,
                category: "syntax",
                path: String::new(),
                message: format!("failed to read config file: {e}"),
            }],
            config_path: Some(actual_path.clone()),
        },
    }
}

/// Validate a TOML string without file-system side effects.
#[must_use]
pub fn validate_toml_str(toml_str: &str) -> ValidationResult {
    let mut diagnostics = Vec::new();

    // 1. Syntax
    let toml_value: toml::Value = match toml::from_str(toml_str) {
        Ok(v) => v,
        Err(e) => {
            diagnostics.push(Diagnostic {
                severity: Severity::Error,
                category: "syntax",
                path: String::new(),
                message: format!("TOML syntax error: {e}"),
            });
            return ValidationResult {
                diagnostics,
                config_path: None,
            };
        },
    };

    // 2. Unknown fields
    check_unknown_fields(&toml_value, &build_schema_map(), "", &mut diagnostics);

    // 3. Types, then semantics on the parsed config
    match toml::from_str::<DeskrouteConfig>(toml_str) {
        Ok(config) => check_semantics(&config, &mut diagnostics),
        Err(e) => diagnostics.push(Diagnostic {
            severity: Severity::Error,
            category: "type-error",
            path: String::new(),
            message: format!("type error: {e}"),
        }),
    }

    ValidationResult {
        diagnostics,
        config_path: None,
    }
}

/// Walk the TOML value tree against the schema tree and flag unknown keys.
fn check_unknown_fields(
    value: &toml::Value,
    schema: &KnownKeys,
    prefix: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    match (value, schema) {
        (toml::Value::Table(table), KnownKeys::Struct(fields)) => {
            let known_keys: Vec<&str> = fields.keys().copied().collect();
            for (key, child_value) in table {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                if let Some(child_schema) = fields.get(key.as_str()) {
                    check_unknown_fields(child_value, child_schema, &path, diagnostics);
                    continue;
                }
                let message = match suggest(key, &known_keys, 3) {
                    Some(s) => format!("unknown field (did you mean \"{s}\"?)"),
                    None => "unknown field".to_string(),
                };
                diagnostics.push(Diagnostic {
                    severity: Severity::Error,
                    category: "unknown-field",
                    path,
                    message,
                });
            }
        },
        (toml::Value::Array(arr), KnownKeys::Array(item_schema)) => {
            for (i, item) in arr.iter().enumerate() {
                let path = format!("{prefix}[{i}]");
                check_unknown_fields(item, item_schema, &path, diagnostics);
            }
        },
        // Leaf or type mismatch, caught by deserialization.
        _ => {},
    }
}

/// Run routing-specific checks on a successfully parsed config.
fn check_semantics(config: &DeskrouteConfig, diagnostics: &mut Vec<Diagnostic>) {
    let mut seen = HashSet::new();
    for (i, team) in config.teams.iter().enumerate() {
        if !seen.insert(team.id) {
            diagnostics.push(Diagnostic {
                severity: Severity::Error,
                category: "teams",
                path: format!("teams[{i}].id"),
                message: format!("duplicate team id {}", team.id),
            });
        }
        match &team.leader {
            None => diagnostics.push(Diagnostic {
                severity: Severity::Info,
                category: "teams",
                path: format!("teams[{i}]"),
                message: format!("team \"{}\" has no leader; nobody is notified", team.name),
            }),
            Some(leader) if leader.email.as_deref().is_none_or(|e| e.trim().is_empty()) => {
                diagnostics.push(Diagnostic {
                    severity: Severity::Warning,
                    category: "teams",
                    path: format!("teams[{i}].leader.email"),
                    message: format!(
                        "leader \"{}\" has no email; only the in-app note is posted",
                        leader.name
                    ),
                });
            },
            Some(_) => {},
        }
    }

    let routing = &config.routing;
    if let Some(raw) = &routing.internal_domains {
        if parse_domains(raw).is_empty() {
            diagnostics.push(Diagnostic {
                severity: Severity::Warning,
                category: "routing",
                path: "routing.internal_domains".into(),
                message: "no domains listed; falls back to \"wavext.io\"".into(),
            });
        }
        for entry in raw.split(',').map(normalize_domain) {
            if entry.contains('@') || entry.contains(char::is_whitespace) {
                diagnostics.push(Diagnostic {
                    severity: Severity::Warning,
                    category: "routing",
                    path: "routing.internal_domains".into(),
                    message: format!("\"{entry}\" is not a bare domain and will never match"),
                });
            }
        }
    }

    for kind in TeamKind::ALL {
        let (key, value) = match kind {
            TeamKind::Internal => ("internal_team_id", &routing.internal_team_id),
            TeamKind::External => ("external_team_id", &routing.external_team_id),
        };
        check_team_param(config, *kind, key, value.as_ref(), diagnostics);
    }

    if let Some(value) = &routing.enable_notifications {
        let raw = value.as_param();
        let lower = raw.trim().to_ascii_lowercase();
        if lower != "true" && lower != "false" {
            diagnostics.push(Diagnostic {
                severity: Severity::Warning,
                category: "routing",
                path: "routing.enable_notifications".into(),
                message: format!("\"{raw}\" is not \"True\"/\"False\"; notifications are disabled"),
            });
        }
    }
}

fn check_team_param(
    config: &DeskrouteConfig,
    kind: TeamKind,
    key: &str,
    value: Option<&ParamValue>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let path = format!("routing.{key}");
    let configured = value.map(ParamValue::as_param).filter(|v| !v.trim().is_empty());

    let Some(raw) = configured else {
        let seed_ref = kind.default_team_ref();
        let has_seed = config
            .teams
            .iter()
            .any(|t| t.symbolic_ref.as_deref() == Some(seed_ref));
        if !has_seed {
            diagnostics.push(Diagnostic {
                severity: Severity::Warning,
                category: "teams",
                path,
                message: format!(
                    "no team configured and no seed team \"{seed_ref}\"; {kind} tickets stay unassigned"
                ),
            });
        }
        return;
    };

    match raw.parse::<TeamId>() {
        Err(e) => diagnostics.push(Diagnostic {
            severity: Severity::Error,
            category: "type-error",
            path,
            message: format!("{e}; the seed team is used instead"),
        }),
        Ok(id) if !config.teams.is_empty() && !config.teams.iter().any(|t| t.id == id) => {
            diagnostics.push(Diagnostic {
                severity: Severity::Warning,
                category: "teams",
                path,
                message: format!("team {id} is not among the configured teams; {kind} tickets stay unassigned"),
            });
        },
        Ok(_) => {},
    }
}
