//! Markdown rendering of results.

use quill_core::Locale;
use serde::Deserialize;

use super::extract::Analysis;
use super::messages::from_cache_caption;
use super::variants::{Layout, Variant};

#[derive(Debug, Deserialize)]
struct ConversionPath {
    #[serde(default)]
    cta: String,
    #[serde(default)]
    lead_magnet: String,
    #[serde(default)]
    follow_up: String,
    #[serde(default)]
    strategy_logic: String,
}

#[derive(Debug, Deserialize)]
struct GapAnalysis {
    #[serde(default)]
    missing_topics: Vec<MissingTopic>,
    #[serde(default)]
    summary_analysis: String,
}

#[derive(Debug, Deserialize)]
struct MissingTopic {
    #[serde(default)]
    topic_title: String,
    #[serde(default)]
    gap_reason: String,
    #[serde(default)]
    format_suggestion: String,
}

/// Render a result for display.
pub fn render_markdown(variant: &Variant, analysis: &Analysis, from_cache: bool, locale: Locale) -> String {
    let mut out = format!("# {}\n\n", variant.title);

    match (variant.layout, analysis) {
        (_, Analysis::Text { headline, body }) => {
            out.push_str(&format!("## {headline}\n\n"));
            let detail = body.trim_start().strip_prefix(headline.as_str()).unwrap_or(body.as_str()).trim();
            if !detail.is_empty() {
                out.push_str(detail);
                out.push('\n');
            }
        }
        (Layout::ConversionPath, Analysis::Structured { data }) => match ConversionPath::deserialize(data) {
            Ok(path) => render_conversion_path(&mut out, &path, locale),
            Err(_) => render_json(&mut out, data),
        },
        (Layout::TopicTable, Analysis::Structured { data }) => match GapAnalysis::deserialize(data) {
            Ok(gaps) => render_gaps(&mut out, &gaps, locale),
            Err(_) => render_json(&mut out, data),
        },
        (Layout::Headline, Analysis::Structured { data }) => render_json(&mut out, data),
    }

    if from_cache {
        out.push_str(&format!("\n_{}_\n", from_cache_caption(locale)));
    }

    out
}

fn render_conversion_path(out: &mut String, path: &ConversionPath, locale: Locale) {
    let (cta, magnet, follow_up, logic) = match locale {
        Locale::Ar => ("عبارة النداء (CTA)", "المغناطيس الجاذب (Lead Magnet)", "رسالة المتابعة الأولى", "المنطق الاستراتيجي"),
        Locale::En => ("Call to action", "Lead magnet", "First follow-up message", "Strategy logic"),
    };

    out.push_str(&format!("1. **{cta}:** {}\n", path.cta.trim()));
    out.push_str(&format!("2. **{magnet}:** {}\n", path.lead_magnet.trim()));
    out.push_str(&format!("3. **{follow_up}:** {}\n", path.follow_up.trim()));
    out.push_str(&format!("\n🎯 **{logic}:** {}\n", path.strategy_logic.trim()));
}

fn render_gaps(out: &mut String, gaps: &GapAnalysis, locale: Locale) {
    if !gaps.summary_analysis.trim().is_empty() {
        out.push_str(gaps.summary_analysis.trim());
        out.push_str("\n\n");
    }

    if gaps.missing_topics.is_empty() {
        out.push_str(match locale {
            Locale::Ar => "النموذج لم يجد فجوات واضحة بين القائمتين. ربما المحتوى متشابه جداً.\n",
            Locale::En => "No clear gaps found between the two lists; the content may be very similar.\n",
        });
        return;
    }

    let headers = match locale {
        Locale::Ar => ["الموضوع المقترح", "سبب كونها فجوة / فرصة", "اقتراح شكل المحتوى"],
        Locale::En => ["Suggested topic", "Why it is a gap", "Suggested format"],
    };
    out.push_str(&format!("| {} | {} | {} |\n|---|---|---|\n", headers[0], headers[1], headers[2]));
    for topic in &gaps.missing_topics {
        out.push_str(&format!(
            "| {} | {} | {} |\n",
            table_cell(&topic.topic_title),
            table_cell(&topic.gap_reason),
            table_cell(&topic.format_suggestion)
        ));
    }
}

fn render_json(out: &mut String, data: &serde_json::Value) {
    let pretty = serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string());
    out.push_str(&format!("```json\n{pretty}\n```\n"));
}

fn table_cell(text: &str) -> String {
    quill_core::normalize(text).replace('|', "\\|")
}
