//! Makam → key-signature distribution report over an ABC tune corpus.
//!
//! Each tune starts at an `X:` line; `T:` lines are titles and the first
//! `K:` line is the key signature. The makam is not a header field, so it is
//! guessed from the titles (SymbTr puts it first on the second title line).

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument};

use crate::error::{PromptError, Result};
use crate::text::{decode_lossy, normalize_newlines};

pub const SCHEMA_VERSION: u32 = 1;

const MAKAM_DETECTION_NOTE: &str = "Heuristic: first token of the 2nd T: line when present; normalized to ASCII; keeps hyphenated forms.";
const K_FORMAT_NOTE: &str = "K: appears to encode 53-EDO accidental sets (SymbTr convention) rather than major/minor.";

static LETTER_RUN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([A-Za-zÇĞİÖŞÜçğıöşüâîû]{3,}(?:-[A-Za-zÇĞİÖŞÜçğıöşüâîû]{2,})?)\b")
        .expect("letter run regex")
});

static HAS_LETTER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-zÇĞİÖŞÜçğıöşüâîû]").expect("letter regex"));

const TOKEN_EDGES: [char; 9] = [',', ':', ';', '(', ')', '[', ']', '{', '}'];

/// One tune header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tune {
    pub index: String,
    pub titles: Vec<String>,
    /// Value of the first `K:` line, which may be empty
    pub key_signature: Option<String>,
    pub makam_key: Option<String>,
}

/// Fold Turkish and common Latin diacritics to ASCII, lowercase, and keep
/// only `[a-z0-9-]`.
pub fn normalize_token(token: &str) -> String {
    let mut out: String = token.trim().chars().map(fold_char).collect();
    out.retain(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    out
}

/// Accented Latin letters (Latin-1 Supplement and Latin Extended-A) grouped by
/// their ASCII base letter.
const FOLD_TABLE: [(&str, char); 19] = [
    ("àáâãäåāăąÀÁÂÃÄÅĀĂĄ", 'a'),
    ("çćĉċčÇĆĈĊČ", 'c'),
    ("ďđĎĐ", 'd'),
    ("èéêëēĕėęěÈÉÊËĒĔĖĘĚ", 'e'),
    ("ĝğġģĜĞĠĢ", 'g'),
    ("ĥħĤĦ", 'h'),
    ("ìíîïĩīĭįıÌÍÎÏĨĪĬĮİ", 'i'),
    ("ĵĴ", 'j'),
    ("ķĶ", 'k'),
    ("ĺļľŀłĹĻĽĿŁ", 'l'),
    ("ñńņňŉÑŃŅŇ", 'n'),
    ("òóôõöøōŏőÒÓÔÕÖØŌŎŐ", 'o'),
    ("ŕŗřŔŖŘ", 'r'),
    ("śŝşšŚŜŞŠ", 's'),
    ("ţťŧŢŤŦ", 't'),
    ("ùúûüũūŭůűųÙÚÛÜŨŪŬŮŰŲ", 'u'),
    ("ŵŴ", 'w'),
    ("ýÿŷÝŸŶ", 'y'),
    ("źżžŹŻŽ", 'z'),
];

/// Anything left non-ASCII (typographic quotes included) is dropped by the
/// caller's filter.
fn fold_char(ch: char) -> char {
    if ch.is_ascii() {
        return ch.to_ascii_lowercase();
    }
    FOLD_TABLE
        .iter()
        .find(|(group, _)| group.contains(ch))
        .map_or(ch, |(_, base)| *base)
}

/// Guess the makam from a tune's titles.
pub fn extract_makam_key(titles: &[String]) -> Option<String> {
    let candidate = titles.get(1).or_else(|| titles.first())?;
    let token = candidate
        .split_whitespace()
        .next()
        .unwrap_or("")
        .trim_matches(TOKEN_EDGES);

    let key = if !token.is_empty() && HAS_LETTER_RE.is_match(token) {
        normalize_token(token)
    } else {
        let joined = titles.join(" ");
        let run = LETTER_RUN_RE.captures(&joined)?.get(1)?;
        normalize_token(run.as_str())
    };

    (!key.is_empty()).then_some(key)
}

fn header_value<'a>(line: &'a str, field: &str) -> Option<&'a str> {
    line.strip_prefix(field).map(str::trim)
}

/// Split an ABC corpus into tune headers.
pub fn parse_tunes(corpus: &str) -> Vec<Tune> {
    let mut tunes = Vec::new();
    let mut current: Option<Tune> = None;

    for line in normalize_newlines(corpus).split('\n') {
        if let Some(index) = header_value(line, "X:") {
            tunes.extend(current.take().map(finish_tune));
            current = Some(Tune {
                index: index.to_string(),
                titles: Vec::new(),
                key_signature: None,
                makam_key: None,
            });
            continue;
        }

        let Some(tune) = current.as_mut() else {
            continue;
        };
        if let Some(title) = header_value(line, "T:") {
            tune.titles.push(title.to_string());
        } else if let Some(key) = header_value(line, "K:") {
            if tune.key_signature.is_none() {
                tune.key_signature = Some(key.to_string());
            }
        }
    }

    tunes.extend(current.take().map(finish_tune));
    tunes
}

fn finish_tune(mut tune: Tune) -> Tune {
    tune.makam_key = extract_makam_key(&tune.titles);
    tune
}

/// Insertion-ordered counter; serializes as a map sorted by count, ties in
/// first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    order: Vec<String>,
    counts: HashMap<String, usize>,
}

impl Tally {
    pub fn add(&mut self, key: &str) {
        match self.counts.get_mut(key) {
            Some(count) => *count += 1,
            None => {
                self.order.push(key.to_string());
                self.counts.insert(key.to_string(), 1);
            }
        }
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn get(&self, key: &str) -> usize {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub fn most_common(&self) -> Vec<(&str, usize)> {
        let mut entries: Vec<(&str, usize)> = self
            .order
            .iter()
            .map(|key| (key.as_str(), self.counts[key]))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries
    }
}

impl Serialize for Tally {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.most_common())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceInfo {
    pub path: String,
    pub sha256: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MakamEntry {
    pub count: usize,
    pub k_signatures: Tally,
}

/// Per-makam entries, serialized by descending count.
#[derive(Debug, Clone, Default)]
pub struct MakamTable {
    entries: Vec<(String, MakamEntry)>,
}

impl MakamTable {
    pub fn get(&self, key: &str) -> Option<&MakamEntry> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, entry)| entry)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl Serialize for MakamTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(k, v)| (k, v)))
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportNotes {
    pub makam_detection: String,
    pub k_format: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MakamReport {
    pub schema_version: u32,
    pub generated_at: String,
    pub source: SourceInfo,
    pub tunes_total: usize,
    pub k_signature_totals: Tally,
    pub by_makam: MakamTable,
    pub notes: ReportNotes,
}

/// Tally key signatures overall and per makam.
pub fn tally_tunes(tunes: &[Tune]) -> (Tally, MakamTable) {
    let mut by_k = Tally::default();
    let mut per_makam: Vec<(String, Tally)> = Vec::new();

    for tune in tunes {
        let Some(k) = tune.key_signature.as_deref().filter(|k| !k.is_empty()) else {
            continue;
        };
        by_k.add(k);

        let Some(makam) = tune.makam_key.as_deref() else {
            continue;
        };
        match per_makam.iter_mut().find(|(key, _)| key == makam) {
            Some((_, tally)) => tally.add(k),
            None => {
                let mut tally = Tally::default();
                tally.add(k);
                per_makam.push((makam.to_string(), tally));
            }
        }
    }

    let mut entries: Vec<(String, MakamEntry)> = per_makam
        .into_iter()
        .map(|(key, tally)| {
            let entry = MakamEntry {
                count: tally.total(),
                k_signatures: tally,
            };
            (key, entry)
        })
        .collect();
    entries.sort_by(|a, b| b.1.count.cmp(&a.1.count));

    (by_k, MakamTable { entries })
}

/// Streaming SHA-256 of a file.
pub fn sha256_file(path: &Path) -> Result<String> {
    let file = File::open(path).map_err(|err| PromptError::io(path, err))?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; 1024 * 1024];
    loop {
        let read = reader.read(&mut buf).map_err(|err| PromptError::io(path, err))?;
        if read == 0 {
            break;
        }
        hasher.update(&buf[..read]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Build the report for the corpus at `input`.
#[instrument(skip_all, fields(input = %input.display()))]
pub fn build_report(input: &Path) -> Result<MakamReport> {
    let digest = sha256_file(input)?;
    let bytes = fs::read(input).map_err(|err| PromptError::io(input, err))?;
    let tunes = parse_tunes(&decode_lossy(&bytes));
    debug!(tunes = tunes.len(), "corpus parsed");

    let (k_signature_totals, by_makam) = tally_tunes(&tunes);

    Ok(MakamReport {
        schema_version: SCHEMA_VERSION,
        generated_at: Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        source: SourceInfo {
            path: input.display().to_string(),
            sha256: digest,
        },
        tunes_total: tunes.len(),
        k_signature_totals,
        by_makam,
        notes: ReportNotes {
            makam_detection: MAKAM_DETECTION_NOTE.to_string(),
            k_format: K_FORMAT_NOTE.to_string(),
        },
    })
}

/// Write the report as pretty JSON with a trailing newline.
pub fn write_report(report: &MakamReport, output: &Path) -> Result<()> {
    let mut json = serde_json::to_string_pretty(report)
        .map_err(|err| PromptError::json("makam report", err))?;
    json.push('\n');

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| PromptError::io(parent, err))?;
    }
    fs::write(output, json).map_err(|err| PromptError::io(output, err))?;

    info!(
        output = %output.display(),
        tunes = report.tunes_total,
        makams = report.by_makam.entries.len(),
        "makam report written"
    );
    Ok(())
}
