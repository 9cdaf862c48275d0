//! The catalogue of analysis tools.
//!
//! Each variant is a fixed preamble, a prompt template, one or two input
//! fields with a minimum length, an output format and sampling settings.
//! Its scope id separates its cache rows and counters from the others.

use quill_core::{AnalysisRequest, Error, Locale};
use serde_json::{Value, json};

use crate::gemini::{GenerateRequest, SamplingConfig};

/// One user input field.
#[derive(Debug)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label_ar: &'static str,
    pub label_en: &'static str,
}

impl FieldSpec {
    pub fn label(&self, locale: Locale) -> &'static str {
        match locale {
            Locale::Ar => self.label_ar,
            Locale::En => self.label_en,
        }
    }
}

/// What the service is asked to return.
#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    /// Plain text; first line is a headline, the whole text is the detail.
    FreeText,
    /// JSON constrained by a response schema.
    Structured { schema: fn() -> Value },
}

/// How a result is laid out in Markdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Headline,
    ConversionPath,
    TopicTable,
}

#[derive(Debug)]
pub struct Variant {
    /// MCP tool name.
    pub tool: &'static str,
    pub scope_id: &'static str,
    pub title: &'static str,
    /// Help-panel text shown by `list_analyzers`.
    pub help: &'static str,
    pub fields: &'static [FieldSpec],
    /// Minimum characters per normalized field.
    pub min_chars: usize,
    pub role: &'static str,
    pub task: &'static str,
    pub prompt: fn(&[String]) -> String,
    pub output: OutputFormat,
    pub sampling: SamplingConfig,
    pub layout: Layout,
}

impl Variant {
    /// Reject missing, empty or too-short fields before any network call.
    pub fn validate(&self, request: &AnalysisRequest) -> Result<(), Error> {
        if request.normalized_input.len() != self.fields.len() {
            return Err(Error::InvalidInput(format!(
                "{} expects {} field(s), got {}",
                self.tool,
                self.fields.len(),
                request.normalized_input.len()
            )));
        }

        if let Some(field) = self
            .fields
            .iter()
            .zip(&request.normalized_input)
            .find_map(|(spec, text)| text.is_empty().then_some(spec))
        {
            return Err(Error::EmptyInput { field: field.name.into() });
        }

        for (spec, text) in self.fields.iter().zip(&request.normalized_input) {
            let actual = text.chars().count();
            if actual < self.min_chars {
                return Err(Error::InputTooShort { field: spec.name.into(), min: self.min_chars, actual });
            }
        }

        Ok(())
    }

    /// Assemble the outbound request from the user's raw text.
    pub fn build_request(&self, raw_fields: &[String], output_language: &str) -> GenerateRequest {
        let format_rule = match self.output {
            OutputFormat::FreeText => {
                "The first line must be a one-line headline containing the score; \
                 put the detailed analysis on the following lines. Do not use JSON."
            }
            OutputFormat::Structured { .. } => "Respond with JSON only, matching the provided schema exactly.",
        };

        GenerateRequest {
            system_instruction: format!(
                "{} {} Write every value in {}. {}",
                self.role, self.task, output_language, format_rule
            ),
            prompt: (self.prompt)(raw_fields),
            sampling: self.sampling,
            response_schema: match self.output {
                OutputFormat::FreeText => None,
                OutputFormat::Structured { schema } => Some(schema()),
            },
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}

fn field(fields: &[String], idx: usize) -> &str {
    fields.get(idx).map(|s| s.trim()).unwrap_or_default()
}

fn viral_prompt(fields: &[String]) -> String {
    format!("Score the viral potential of this post:\n\n{}", field(fields, 0))
}

fn conversion_prompt(fields: &[String]) -> String {
    format!(
        "Topic: {}\nFinal offer: {}\nDesign a 3-step micro-conversion path.",
        field(fields, 0),
        field(fields, 1)
    )
}

fn gap_prompt(fields: &[String]) -> String {
    format!(
        "Compare the two lists of posts (the client's and the competitors'), extract missing topics, \
         give the reason each one is a gap, and suggest the best content format.\n\n\
         Client posts:\n{}\n\nCompetitor posts:\n{}\n",
        field(fields, 0),
        field(fields, 1)
    )
}

fn conversion_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "cta": {"type": "STRING", "description": "High-impact call to action"},
            "lead_magnet": {"type": "STRING", "description": "Lead magnet type and its content"},
            "follow_up": {"type": "STRING", "description": "Recommended follow-up message"},
            "strategy_logic": {"type": "STRING", "description": "Why this path works"}
        },
        "required": ["cta", "lead_magnet", "follow_up", "strategy_logic"]
    })
}

fn gap_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "missing_topics": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "topic_title": {"type": "STRING"},
                        "gap_reason": {"type": "STRING"},
                        "format_suggestion": {"type": "STRING"}
                    },
                    "required": ["topic_title", "gap_reason", "format_suggestion"]
                }
            },
            "summary_analysis": {"type": "STRING"}
        },
        "required": ["missing_topics", "summary_analysis"]
    })
}

pub static VIRAL_SCORE: Variant = Variant {
    tool: "viral_score",
    scope_id: "viral-potential-scorer-v1",
    title: "Viral Potential Scorer",
    help: "Paste a social post. The model scores its viral potential from 0 to 100 on the first line, \
           then explains the hook, emotional pull, shareability and what to change.",
    fields: &[FieldSpec { name: "post", label_ar: "نص المنشور", label_en: "Post text" }],
    min_chars: 20,
    role: "You are a social media growth analyst.",
    task: "Score the viral potential of the given post from 0 to 100 and explain the score: hook strength, \
           emotional trigger, shareability, and concrete improvements.",
    prompt: viral_prompt,
    output: OutputFormat::FreeText,
    sampling: SamplingConfig::minimal_variance(),
    layout: Layout::Headline,
};

pub static CONVERSION_PATH: Variant = Variant {
    tool: "conversion_path",
    scope_id: "conversion-path-builder-v1",
    title: "Micro-Conversion Path Builder",
    help: "A micro-conversion is a small step before the big purchase, such as downloading a free guide \
           or joining a newsletter. Give a content topic and the final offer; the model designs a \
           call to action, a lead magnet, and a follow-up message, plus the reasoning behind the path.",
    fields: &[
        FieldSpec { name: "topic", label_ar: "موضوع المحتوى", label_en: "Content topic" },
        FieldSpec { name: "offer", label_ar: "العرض النهائي", label_en: "Final offer" },
    ],
    min_chars: 15,
    role: "You are a Conversion Rate Optimization (CRO) expert.",
    task: "Create a 3-step micro-conversion path for a given topic and offer. Step 1: high-impact CTA. \
           Step 2: irresistible lead magnet. Step 3: engaging follow-up message.",
    prompt: conversion_prompt,
    output: OutputFormat::Structured { schema: conversion_schema },
    sampling: SamplingConfig::service_default(),
    layout: Layout::ConversionPath,
};

pub static MISSING_TOPICS: Variant = Variant {
    tool: "missing_topics",
    scope_id: "missing-topic-generator-v1",
    title: "Missing Topic Generator",
    help: "Paste titles or summaries of your last 10 posts and of your competitors' last 10 posts. \
           The model runs a content gap analysis and suggests topics nobody covers well yet, why each \
           one is an opportunity, and the best format for it (short video, carousel, live, series).",
    fields: &[
        FieldSpec { name: "my_posts", label_ar: "منشوراتك", label_en: "Your posts" },
        FieldSpec { name: "competitor_posts", label_ar: "منشورات المنافسين", label_en: "Competitor posts" },
    ],
    min_chars: 50,
    role: "You are a marketing content strategist specializing in content gap analysis.",
    task: "Compare the client's posts with the competitors' posts and extract 5-7 strategic missing \
           topics that could strongly attract the audience.",
    prompt: gap_prompt,
    output: OutputFormat::Structured { schema: gap_schema },
    sampling: SamplingConfig { temperature: Some(0.2), top_p: Some(0.8), top_k: Some(32), max_output_tokens: Some(1200) },
    layout: Layout::TopicTable,
};

/// Every variant, in display order.
pub fn all() -> [&'static Variant; 3] {
    [&VIRAL_SCORE, &CONVERSION_PATH, &MISSING_TOPICS]
}

pub fn by_tool(tool: &str) -> Option<&'static Variant> {
    all().into_iter().find(|v| v.tool == tool)
}
