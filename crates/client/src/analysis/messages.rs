//! Localized user-facing messages.
//!
//! Validation problems get a specific warning. Every other failure is reduced
//! to a generic message for its [`ErrorKind`]; details only go to the log.

use quill_core::{Error, ErrorKind, Locale};

use super::variants::Variant;

/// Text shown to the user for a failed analysis.
pub fn user_message(variant: &Variant, err: &Error, locale: Locale) -> String {
    let label = |field: &str| variant.field(field).map(|f| f.label(locale)).unwrap_or("?").to_string();

    match (err, locale) {
        (Error::EmptyInput { field }, Locale::Ar) => {
            format!("الرجاء إدخال {} حتى يتمكن النظام من التحليل.", label(field))
        }
        (Error::EmptyInput { field }, Locale::En) => format!("Please fill in {} before running the analysis.", label(field)),
        (Error::InputTooShort { field, min, .. }, Locale::Ar) => {
            format!("يفضّل إدخال وصف أكثر في {} (على الأقل {} حرفاً) للحصول على تحليل أدق.", label(field), min)
        }
        (Error::InputTooShort { field, min, .. }, Locale::En) => {
            format!("{} is too short: enter at least {} characters for an accurate analysis.", label(field), min)
        }
        _ => generic_message(err.kind(), locale).to_string(),
    }
}

/// Generic message for a failure kind.
pub fn generic_message(kind: ErrorKind, locale: Locale) -> &'static str {
    match (kind, locale) {
        (ErrorKind::Validation, Locale::Ar) => "الرجاء مراجعة المدخلات والمحاولة مرة أخرى.",
        (ErrorKind::Validation, Locale::En) => "Please check your input and try again.",
        (ErrorKind::Quota, Locale::Ar) => "الخدمة مشغولة حالياً. يرجى المحاولة بعد قليل.",
        (ErrorKind::Quota, Locale::En) => "The service is busy right now. Please try again in a moment.",
        (ErrorKind::Parse, Locale::Ar) => "تعذر الحصول على تحليل صالح من النموذج. يرجى المحاولة لاحقاً.",
        (ErrorKind::Parse, Locale::En) => "Could not get a valid analysis from the model. Please try again later.",
        (_, Locale::Ar) => "حدث خطأ أثناء التحليل. يرجى المحاولة لاحقاً.",
        (_, Locale::En) => "Something went wrong during the analysis. Please try again later.",
    }
}

/// Caption attached to results served from the cache.
pub fn from_cache_caption(locale: Locale) -> &'static str {
    match locale {
        Locale::Ar => "✅ تم جلب هذه النتيجة من الكاش لتسريع التحليل وتقليل استهلاك الـ API.",
        Locale::En => "✅ Served from cache: same input, same result, no extra API call.",
    }
}
