//! Built-in defaults for colors, key bindings and tunable parameters

use crate::error::{ConfigError, Result};
use once_cell::sync::Lazy;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Process-wide built-in defaults
pub static DEFAULTS: Lazy<Defaults> = Lazy::new(Defaults::builtin);

/// A single tunable parameter value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Integer(i64),
    Text(String),
    /// Stored on disk as `1` / `0`
    Flag(bool),
    /// Not written to the config file at all
    Disabled,
}

impl ParamValue {
    /// Value as written to the config file, `None` when the key is omitted
    pub fn encode(&self) -> Option<String> {
        match self {
            ParamValue::Integer(n) => Some(n.to_string()),
            ParamValue::Text(s) => Some(s.clone()),
            ParamValue::Flag(true) => Some("1".to_string()),
            ParamValue::Flag(false) => Some("0".to_string()),
            ParamValue::Disabled => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            ParamValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParamValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            ParamValue::Flag(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.encode() {
            Some(s) => f.write_str(&s),
            None => f.write_str("<disabled>"),
        }
    }
}

/// How a param's on-disk string is decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Integer,
    Text,
    Flag,
}

/// Decode rule table: which kind each known param is read as
pub fn param_kind(name: &str) -> Option<ParamKind> {
    match name {
        "refresh" | "box_position" => Some(ParamKind::Integer),
        "tweet_border" | "relative_time" | "retweet_by" => Some(ParamKind::Flag),
        "logging_level" | "header_template" | "dm_template" | "openurl_command" => {
            Some(ParamKind::Text)
        }
        _ => None,
    }
}

impl ParamKind {
    /// Decode `raw` for the param `key`
    ///
    /// Mismatches are errors, never silently coerced.
    pub fn decode(self, key: &str, raw: &str) -> Result<ParamValue> {
        match self {
            ParamKind::Text => Ok(ParamValue::Text(raw.to_string())),
            ParamKind::Integer => parse_integer(key, raw).map(ParamValue::Integer),
            ParamKind::Flag => match parse_integer(key, raw)? {
                0 => Ok(ParamValue::Flag(false)),
                1 => Ok(ParamValue::Flag(true)),
                _ => Err(ConfigError::InvalidFlag {
                    key: key.to_string(),
                    value: raw.to_string(),
                }),
            },
        }
    }
}

fn parse_integer(key: &str, raw: &str) -> Result<i64> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidInteger {
            key: key.to_string(),
            value: raw.to_string(),
        })
}

/// A named color definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteEntry {
    pub name: String,
    pub color: String,
}

impl PaletteEntry {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
        }
    }
}

/// The three default collections
///
/// Never mutated once built; overlays copy out of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Defaults {
    params: BTreeMap<String, ParamValue>,
    keys: BTreeMap<String, String>,
    palette: Vec<PaletteEntry>,
}

impl Defaults {
    /// Build a custom set of defaults, rejecting repeated palette names
    pub fn new(
        params: BTreeMap<String, ParamValue>,
        keys: BTreeMap<String, String>,
        palette: Vec<PaletteEntry>,
    ) -> Result<Self> {
        let mut seen = HashSet::new();
        for entry in &palette {
            if !seen.insert(entry.name.as_str()) {
                return Err(ConfigError::DuplicatePaletteEntry(entry.name.clone()));
            }
        }
        Ok(Self {
            params,
            keys,
            palette,
        })
    }

    pub fn params(&self) -> &BTreeMap<String, ParamValue> {
        &self.params
    }

    pub fn keys(&self) -> &BTreeMap<String, String> {
        &self.keys
    }

    pub fn palette(&self) -> &[PaletteEntry] {
        &self.palette
    }

    fn builtin() -> Self {
        let params = [
            ("refresh", ParamValue::Integer(2)),
            ("box_position", ParamValue::Integer(1)),
            ("tweet_border", ParamValue::Flag(true)),
            ("relative_time", ParamValue::Flag(true)),
            ("retweet_by", ParamValue::Flag(true)),
            ("openurl_command", ParamValue::Text("firefox %s".to_string())),
            ("logging_level", ParamValue::Disabled),
            (
                "header_template",
                ParamValue::Text(
                    "{username}{retweeted}{retweeter} - {time}{reply} {retweet_count}"
                        .to_string(),
                ),
            ),
            (
                "dm_template",
                ParamValue::Text("{sender_screen_name} => {recipient_screen_name} - {time}".to_string()),
            ),
        ];

        let keys = [
            // motion
            ("up", "k"),
            ("down", "j"),
            ("left", "h"),
            ("right", "l"),
            ("scroll_to_top", "g"),
            ("scroll_to_bottom", "G"),
            // buffers
            ("activate_first_buffer", "a"),
            ("activate_last_buffer", "e"),
            ("shift_buffer_left", "<"),
            ("shift_buffer_right", ">"),
            ("delete_buffer", "d"),
            ("mark_all_as_read", "A"),
            // timelines
            ("home", "."),
            ("own_tweets", "_"),
            ("favorites", "b"),
            ("mentions", "m"),
            ("direct_messages", "M"),
            ("search", "s"),
            ("search_user", "S"),
            ("thread", "T"),
            // tweets
            ("tweet", "t"),
            ("reply", "r"),
            ("retweet", "R"),
            ("retweet_and_edit", "E"),
            ("delete_tweet", "X"),
            ("send_dm", "D"),
            ("fav", "f"),
            ("delete_fav", "F"),
            ("follow_selected", "w"),
            ("unfollow_selected", "U"),
            ("open_url", "o"),
            // meta
            ("update", "u"),
            ("clear", "c"),
            ("redraw", "^L"),
            ("help", "?"),
            ("quit", "q"),
        ];

        let palette = [
            ("body", "default"),
            ("focus", "dark red"),
            ("header", "light blue"),
            ("line", "dark blue"),
            ("info_msg", "dark green"),
            ("error_msg", "dark red"),
            ("current_tab", "light blue"),
            ("other_tab", "dark blue"),
            ("read", "dark blue"),
            ("unread", "dark red"),
            ("hashtag", "dark green"),
            ("attag", "brown"),
            ("highlight", "dark red"),
            ("highlight_nick", "light red"),
            ("help_bar", "yellow"),
            ("help_key", "dark red"),
        ];

        Self {
            params: params
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            keys: keys
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            palette: palette
                .into_iter()
                .map(|(name, color)| PaletteEntry::new(name, color))
                .collect(),
        }
    }
}
