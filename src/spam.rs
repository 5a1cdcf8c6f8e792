use anyhow::{Context, Result};
use regex::Regex;

/// Fixed rule set: academic-cheating and forged-sick-leave ads.
/// Any single match is a verdict; order carries no weight.
const SPAM_PATTERNS: &[&str] = &[
    r"إجازة\s*مـ?ـرضـ?ـيـ?ـة",
    r"مـعـتمـدة\s*صـ?ـحـ?تـ?ي",
    r"تاريخ\s*قديم\s*تاريخ\s*جديد",
    r"إعداد\s*(بحوث|تقارير|مشاريع)",
    r"حل\s*(انشطة|واجبات)",
    r"عمل\s*(تصاميم|عروض\s*بوربوينت)",
    r"حل\s*اختبارات\s*(كويز|ميد|فاينال)",
    r"عـ?ـذر\s*طـ?ـبي",
    r"إجـ?\s*سكليف",
    r"قطاع\s*خاص\s*حكومي",
    r"بحوث\s*research",
    r"الواجبات\s*homework",
    r"الاختبارات\s*exams",
    r"مشاريع\s*Projects",
    r"البرمجة\s*Programming",
];

/// Stateless spam detector over the fixed rule set.
pub struct SpamFilter {
    rules: Vec<Regex>,
}

impl SpamFilter {
    /// Compile the rule set once. A pattern that fails to compile is a
    /// configuration error and fails startup, never a per-message call.
    pub fn new() -> Result<Self> {
        let rules = SPAM_PATTERNS
            .iter()
            .map(|pattern| {
                Regex::new(&format!("(?i){}", pattern))
                    .with_context(|| format!("Invalid spam pattern: {}", pattern))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// Binary verdict: true if any rule matches the text.
    pub fn is_spam(&self, text: &str) -> bool {
        self.rules.iter().any(|rule| rule.is_match(text))
    }
}
