use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Success,
    Failed,
    Ambiguous,
}

impl StatusClass {
    /// Ambiguous statuses count as failures.
    pub fn outcome(self) -> Outcome {
        match self {
            Self::Success => Outcome::Success,
            Self::Failed | Self::Ambiguous => Outcome::Failure,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRecord {
    pub line_number: usize,
    pub model: ModelId,
    pub part: PartId,
    pub status: String,
    pub class: StatusClass,
}

enum SectionState {
    Outside,
    InModelSection(ModelId),
}

pub struct ReportParser {
    header_regex: Regex,
    part_regex: Regex,
    success_regex: Regex,
    failed_regex: Regex,
    strip_suffixes: Vec<String>,
}

impl ReportParser {
    pub fn new(strip_suffixes: &[String]) -> Result<Self> {
        Ok(Self {
            header_regex: Regex::new(r"^##([^#].*)$").context("failed to compile header regex")?,
            part_regex: Regex::new(r"^\s*-\s*Part\s+(\d+)\s*:\s*(.*?)\s*$")
                .context("failed to compile part line regex")?,
            success_regex: Regex::new(r"\bSuccess\b").context("failed to compile success regex")?,
            failed_regex: Regex::new(r"\bFailed\b").context("failed to compile failed regex")?,
            strip_suffixes: strip_suffixes.to_vec(),
        })
    }

    pub fn parse(&self, text: &str) -> Vec<ReportRecord> {
        let mut state = SectionState::Outside;
        let mut records = Vec::new();

        for (index, line) in text.lines().enumerate() {
            if let Some(captures) = self.header_regex.captures(line) {
                let raw_model = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
                let model = strip_model_suffix(raw_model, &self.strip_suffixes);
                state = if model.is_empty() {
                    SectionState::Outside
                } else {
                    SectionState::InModelSection(ModelId::new(model))
                };
                continue;
            }

            let SectionState::InModelSection(model) = &state else {
                continue;
            };
            let Some(captures) = self.part_regex.captures(line) else {
                continue;
            };

            let part_number = captures
                .get(1)
                .and_then(|m| m.as_str().parse::<u32>().ok());
            let Some(part) = part_number.and_then(PartId::from_number) else {
                debug!(line = index + 1, model = %model, "skipping unrecognized part number");
                continue;
            };

            let status = captures
                .get(2)
                .map(|m| m.as_str())
                .unwrap_or_default()
                .to_string();
            let class = self.classify_status(&status);

            records.push(ReportRecord {
                line_number: index + 1,
                model: model.clone(),
                part,
                status,
                class,
            });
        }

        records
    }

    pub fn classify_status(&self, status: &str) -> StatusClass {
        if self.success_regex.is_match(status) {
            StatusClass::Success
        } else if self.failed_regex.is_match(status) {
            StatusClass::Failed
        } else {
            StatusClass::Ambiguous
        }
    }
}

/// Removes one exact trailing suffix such as `.py`; never strips a character set.
pub fn strip_model_suffix(raw: &str, suffixes: &[String]) -> String {
    let trimmed = raw.trim();
    for suffix in suffixes.iter().filter(|suffix| !suffix.is_empty()) {
        if let Some(stripped) = trimmed.strip_suffix(suffix.as_str()) {
            return stripped.trim_end().to_string();
        }
    }
    trimmed.to_string()
}
