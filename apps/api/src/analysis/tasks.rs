use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::analysis::prompts::{
    MATCH_PERCENTAGE_INSTRUCTION, MISSING_KEYWORDS_INSTRUCTION, SKILL_IMPROVEMENTS_INSTRUCTION,
    SUMMARY_INSTRUCTION,
};

/// The fixed analyses a user can ask for, one per button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisTask {
    Summary,
    SkillImprovements,
    MissingKeywords,
    MatchPercentage,
    /// Percentage, strengths, missing keywords and recommendations in one answer.
    FullReport,
}

impl AnalysisTask {
    pub const ALL: [AnalysisTask; 5] = [
        AnalysisTask::Summary,
        AnalysisTask::SkillImprovements,
        AnalysisTask::MissingKeywords,
        AnalysisTask::MatchPercentage,
        AnalysisTask::FullReport,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AnalysisTask::Summary => "summary",
            AnalysisTask::SkillImprovements => "skill_improvements",
            AnalysisTask::MissingKeywords => "missing_keywords",
            AnalysisTask::MatchPercentage => "match_percentage",
            AnalysisTask::FullReport => "full_report",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            AnalysisTask::Summary => "Resume Summary",
            AnalysisTask::SkillImprovements => "Skill Improvement Suggestions",
            AnalysisTask::MissingKeywords => "Missing Keywords",
            AnalysisTask::MatchPercentage => "ATS Match Percentage",
            AnalysisTask::FullReport => "ATS Analysis Result",
        }
    }

    /// The `Task:` line for the shared template. `FullReport` has its own template.
    pub fn instruction(&self) -> &'static str {
        match self {
            AnalysisTask::Summary => SUMMARY_INSTRUCTION,
            AnalysisTask::SkillImprovements => SKILL_IMPROVEMENTS_INSTRUCTION,
            AnalysisTask::MissingKeywords => MISSING_KEYWORDS_INSTRUCTION,
            AnalysisTask::MatchPercentage => MATCH_PERCENTAGE_INSTRUCTION,
            AnalysisTask::FullReport => "Produce a full ATS analysis.",
        }
    }
}

impl FromStr for AnalysisTask {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        AnalysisTask::ALL
            .into_iter()
            .find(|t| t.name() == wanted)
            .ok_or_else(|| format!("unknown task '{}'", s.trim()))
    }
}

/// What the model is asked to do: a preset task or the user's own words.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskInstruction {
    Preset(AnalysisTask),
    Freeform(String),
}

impl TaskInstruction {
    pub fn title(&self) -> &str {
        match self {
            TaskInstruction::Preset(task) => task.title(),
            TaskInstruction::Freeform(_) => "Custom Analysis",
        }
    }

    pub fn name(&self) -> &str {
        match self {
            TaskInstruction::Preset(task) => task.name(),
            TaskInstruction::Freeform(_) => "custom",
        }
    }
}

impl From<AnalysisTask> for TaskInstruction {
    fn from(task: AnalysisTask) -> Self {
        TaskInstruction::Preset(task)
    }
}
