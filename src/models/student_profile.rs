//! 学生画像
//!
//! 在一次对话中由评分环节逐项填写，会话结束即丢弃，不做持久化。

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::ProfileError;
use crate::models::course::Program;

/// 自评分上限
pub const MAX_SCORE: u8 = 5;

/// 学生画像：所选项目 + 每个知识领域的 0..=5 自评分
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentProfile {
    pub program: Program,
    pub scores: BTreeMap<String, u8>,
}

impl StudentProfile {
    pub fn new(program: Program) -> Self {
        Self {
            program,
            scores: BTreeMap::new(),
        }
    }

    /// 记录一个领域的评分，重复评分覆盖旧值
    pub fn rate(&mut self, area: &str, score: u8) -> Result<(), ProfileError> {
        if score > MAX_SCORE {
            return Err(ProfileError::ScoreOutOfRange {
                area: area.to_string(),
                score,
            });
        }
        self.scores.insert(area.to_string(), score);
        Ok(())
    }

    /// 链式评分，便于构造
    pub fn with_score(mut self, area: &str, score: u8) -> Result<Self, ProfileError> {
        self.rate(area, score)?;
        Ok(self)
    }

    /// 按领域顺序一次性给出全部评分（前端的 "4 3 2 3 1" 形式）
    pub fn from_ratings<'a, I>(program: Program, areas: I, ratings: &[u8]) -> Result<Self, ProfileError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let areas: Vec<&str> = areas.into_iter().collect();
        if areas.len() != ratings.len() {
            return Err(ProfileError::RatingCount {
                expected: areas.len(),
                actual: ratings.len(),
            });
        }

        let mut profile = Self::new(program);
        for (area, score) in areas.into_iter().zip(ratings.iter().copied()) {
            profile.rate(area, score)?;
        }
        Ok(profile)
    }

    pub fn score(&self, area: &str) -> Option<u8> {
        self.scores.get(area).copied()
    }

    /// 检查画像恰好覆盖给定的领域集合
    pub fn check_complete<'a, I>(&self, areas: I) -> Result<(), ProfileError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let areas: Vec<&str> = areas.into_iter().collect();

        if let Some(extra) = self
            .scores
            .keys()
            .find(|rated| !areas.contains(&rated.as_str()))
        {
            return Err(ProfileError::UnknownArea(extra.clone()));
        }

        let missing: Vec<String> = areas
            .into_iter()
            .filter(|area| !self.scores.contains_key(*area))
            .map(str::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(ProfileError::Incomplete { missing });
        }

        Ok(())
    }
}
