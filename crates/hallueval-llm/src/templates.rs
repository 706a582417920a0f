//! Prompt template loading and slot filling.
//!
//! Templates are plain text files, one per prompted operation, living under
//! a prompts directory the backend points at. A missing file is logged and
//! substituted with the empty string rather than surfaced as an error: the
//! resulting malformed query flows through the normal sentinel path (empty
//! extraction, indeterminate judgment) instead of aborting an evaluation run.

use std::fs;
use std::path::Path;
use tracing::error;

/// Default prompts directory, relative to the working directory.
pub const DEFAULT_PROMPT_DIR: &str = "prompts";

/// Template for instruction-wrapped continuation generation.
pub const CONTINUE_WRITING: &str = "continue_writing";
/// Template for keyword extraction from a continuation sentence.
pub const EXTRACT_KWS: &str = "extract_kws";
/// Template for keyword-level hallucination judgment.
pub const IS_KW_HALLUCINATED: &str = "is_kw_hallucinated";
/// Template for pairwise continuation comparison.
pub const COMPARE_TWO_CONTINUATION: &str = "compare_two_continuation";
/// Template for continuation-level hallucination judgment.
pub const IS_CONTINUATION_HALLUCINATED: &str = "is_continuation_hallucinated";

/// Read the template `<dir>/<name>.txt`.
///
/// Returns the full file content, or the empty string (with one ERROR log
/// naming the resolved path) when the file cannot be read. Never fails.
pub fn read_prompt_template(dir: &Path, name: &str) -> String {
    let path = dir.join(format!("{name}.txt"));
    match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(_) => {
            error!(path = %path.display(), "prompt template not found");
            String::new()
        }
    }
}

/// Fill the single positional `{}` slot of a template.
pub fn fill_positional(template: &str, value: &str) -> String {
    template.replace("{}", value)
}

/// Fill every named `{field}` slot of a template.
///
/// Unknown slots are left in place; they end up in the query verbatim and
/// degrade downstream to an unparseable response, which is the intended
/// failure mode for a malformed template.
pub fn fill_named(template: &str, fields: &[(&str, &str)]) -> String {
    let mut filled = template.to_string();
    for (name, value) in fields {
        filled = filled.replace(&format!("{{{name}}}"), value);
    }
    filled
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_existing_template() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join("continue_writing.txt")).unwrap();
        write!(file, "请续写：{{}}").unwrap();

        let template = read_prompt_template(dir.path(), CONTINUE_WRITING);
        assert_eq!(template, "请续写：{}");
    }

    #[test]
    fn missing_template_yields_empty_string() {
        let dir = tempfile::tempdir().unwrap();
        let template = read_prompt_template(dir.path(), "no_such_template");
        assert_eq!(template, "");
    }

    #[test]
    fn missing_template_logs_one_error_per_call() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;
        use tracing_subscriber::layer::SubscriberExt;

        struct CountErrors(Arc<AtomicUsize>);

        impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for CountErrors {
            fn on_event(
                &self,
                event: &tracing::Event<'_>,
                _ctx: tracing_subscriber::layer::Context<'_, S>,
            ) {
                if *event.metadata().level() == tracing::Level::ERROR {
                    self.0.fetch_add(1, Ordering::SeqCst);
                }
            }
        }

        let errors = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(CountErrors(errors.clone()));
        let dir = tempfile::tempdir().unwrap();

        tracing::subscriber::with_default(subscriber, || {
            assert_eq!(read_prompt_template(dir.path(), "no_such_template"), "");
            assert_eq!(errors.load(Ordering::SeqCst), 1);

            assert_eq!(read_prompt_template(dir.path(), "no_such_template"), "");
            assert_eq!(errors.load(Ordering::SeqCst), 2);

            // A readable template logs nothing.
            std::fs::write(dir.path().join("present.txt"), "{}").unwrap();
            assert_eq!(read_prompt_template(dir.path(), "present"), "{}");
            assert_eq!(errors.load(Ordering::SeqCst), 2);
        });
    }

    #[test]
    fn positional_fill() {
        assert_eq!(fill_positional("续写：{}，谢谢", "开头"), "续写：开头，谢谢");
        assert_eq!(fill_positional("", "开头"), "");
    }

    #[test]
    fn named_fill_replaces_each_slot() {
        let template = "标题：{headLine}\n日期：{broadcastDate}\n关键词：{keyword}";
        let query = fill_named(
            template,
            &[
                ("headLine", "台风预警"),
                ("broadcastDate", "2024-03-01 08:00:00"),
                ("keyword", "台风"),
            ],
        );
        assert_eq!(query, "标题：台风预警\n日期：2024-03-01 08:00:00\n关键词：台风");
    }

    #[test]
    fn named_fill_leaves_unknown_slots() {
        let query = fill_named("{headLine} / {unknown}", &[("headLine", "标题")]);
        assert_eq!(query, "标题 / {unknown}");
    }
}
