//! 知识领域注册表
//!
//! 启动时从配置加载 area → 同义关键词映射，此后只读。
//! 匹配时对文本做规范化（小写、ё→е、去变音符号、标点视为分隔符），
//! 然后逐个关键词做词元匹配。

use figment::{
    Figment,
    providers::{Format, Yaml},
};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

use crate::error::ConfigError;
use crate::models::course::Course;
use crate::models::knowledge_area::{KeywordOverlap, KnowledgeArea};

/// 词干可以去掉的结尾字符
const STRIPPABLE_ENDINGS: &[char] = &['а', 'я', 'о', 'е', 'и', 'ы', 'у', 'ю', 'ь', 'й', 'э'];

/// 词干之后允许的最长词尾
const MAX_INFLECTION_LEN: usize = 3;

/// 知识领域注册表
#[derive(Debug, Clone)]
pub struct KnowledgeAreaRegistry {
    areas: BTreeMap<String, KnowledgeArea>,
    overlaps: Vec<KeywordOverlap>,
}

impl KnowledgeAreaRegistry {
    /// 从 `knowledge_areas` 键的值加载
    pub fn load(config: &Value) -> Result<Self, ConfigError> {
        let mapping = config.as_object().ok_or_else(|| {
            ConfigError::MalformedKnowledgeAreas(format!("expected a mapping, got {}", kind_of(config)))
        })?;

        let mut areas = BTreeMap::new();
        for (name, value) in mapping {
            let id = name.trim().to_string();
            if id.is_empty() {
                return Err(ConfigError::MalformedKnowledgeAreas(
                    "knowledge area name is empty".to_string(),
                ));
            }

            let list = value.as_array().ok_or_else(|| {
                ConfigError::MalformedKnowledgeAreas(format!(
                    "keywords of '{}' must be a list, got {}",
                    id,
                    kind_of(value)
                ))
            })?;

            let mut keywords = BTreeSet::new();
            for item in list {
                let keyword = item.as_str().ok_or_else(|| {
                    ConfigError::MalformedKnowledgeAreas(format!(
                        "keywords of '{}' must be strings, got {}",
                        id,
                        kind_of(item)
                    ))
                })?;
                let normalized = normalize(keyword);
                if !normalized.is_empty() {
                    keywords.insert(normalized);
                }
            }

            if keywords.is_empty() {
                return Err(ConfigError::EmptyKeywords(id));
            }

            if areas
                .insert(id.clone(), KnowledgeArea { id: id.clone(), keywords })
                .is_some()
            {
                return Err(ConfigError::MalformedKnowledgeAreas(format!(
                    "duplicate knowledge area '{}'",
                    id
                )));
            }
        }

        let overlaps = find_overlaps(&areas);
        for overlap in &overlaps {
            warn!(
                keyword = %overlap.keyword,
                areas = ?overlap.areas,
                "Keyword is shared by several knowledge areas"
            );
        }

        debug!("Loaded {} knowledge areas", areas.len());
        Ok(Self { areas, overlaps })
    }

    /// 从 YAML 文本加载（读取顶层 `knowledge_areas` 键）
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let value: Value = Figment::from(Yaml::string(yaml))
            .extract_inner("knowledge_areas")
            .map_err(|e| ConfigError::MalformedKnowledgeAreas(e.to_string()))?;
        Self::load(&value)
    }

    /// 领域标识，按字典序；同时也是前端询问评分的顺序
    pub fn area_ids(&self) -> impl Iterator<Item = &str> {
        self.areas.keys().map(String::as_str)
    }

    pub fn areas(&self) -> impl Iterator<Item = &KnowledgeArea> {
        self.areas.values()
    }

    pub fn get(&self, id: &str) -> Option<&KnowledgeArea> {
        self.areas.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.areas.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    /// 被多个领域共享的关键词
    pub fn overlaps(&self) -> &[KeywordOverlap] {
        &self.overlaps
    }

    /// 返回文本命中的所有领域；多个领域同时命中时全部返回
    pub fn match_text(&self, text: &str) -> BTreeSet<String> {
        let normalized = normalize(text);
        let tokens: Vec<&str> = normalized.split(' ').filter(|t| !t.is_empty()).collect();

        self.areas
            .values()
            .filter(|area| {
                area.keywords
                    .iter()
                    .any(|keyword| phrase_matches(keyword, &tokens))
            })
            .map(|area| area.id.clone())
            .collect()
    }

    /// 给课程打上匹配到的领域
    pub fn tag(&self, course: Course) -> Course {
        let areas = self.match_text(&course.name);
        Course {
            knowledge_areas: areas,
            ..course
        }
    }
}

/// 规范化文本：小写、ё→е、去掉组合变音符号，非字母数字字符变为单个空格
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for ch in text.chars().flat_map(char::to_lowercase) {
        if is_combining_mark(ch) {
            // 分解形式的 й（и + 短音符）
            if ch == '\u{0306}' && out.ends_with('и') {
                out.pop();
                out.push('й');
            }
            continue;
        }
        let ch = if ch == 'ё' { 'е' } else { ch };
        if ch.is_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(ch);
        } else {
            pending_space = true;
        }
    }

    out
}

fn is_combining_mark(ch: char) -> bool {
    matches!(ch as u32, 0x0300..=0x036F)
}

fn stem(word: &str) -> Option<&str> {
    let last = word.chars().last()?;
    if word.chars().count() > 4 && STRIPPABLE_ENDINGS.contains(&last) {
        Some(&word[..word.len() - last.len_utf8()])
    } else {
        None
    }
}

fn word_matches(keyword: &str, token: &str) -> bool {
    if keyword == token {
        return true;
    }
    match stem(keyword) {
        Some(stem) => {
            token.starts_with(stem)
                && token.chars().count() - stem.chars().count() <= MAX_INFLECTION_LEN
        }
        None => false,
    }
}

fn phrase_matches(keyword: &str, tokens: &[&str]) -> bool {
    let words: Vec<&str> = keyword.split(' ').collect();
    if words.is_empty() || words.len() > tokens.len() {
        return false;
    }

    tokens.windows(words.len()).any(|window| {
        window
            .iter()
            .zip(words.iter())
            .all(|(token, word)| word_matches(word, token))
    })
}

fn find_overlaps(areas: &BTreeMap<String, KnowledgeArea>) -> Vec<KeywordOverlap> {
    let mut owners: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for area in areas.values() {
        for keyword in &area.keywords {
            owners.entry(keyword.as_str()).or_default().push(area.id.clone());
        }
    }

    owners
        .into_iter()
        .filter(|(_, areas)| areas.len() > 1)
        .map(|(keyword, areas)| KeywordOverlap {
            keyword: keyword.to_string(),
            areas,
        })
        .collect()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}
