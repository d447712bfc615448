//! Human-readable summary renderer for comparison results.

use crate::result::ComparisonResult;

/// Render a short Markdown summary of a [`ComparisonResult`].
///
/// Intended for test failure messages and review output. The long
/// per-difference report is available from
/// [`ComparisonResult::differences_string`].
pub fn render_summary(result: &ComparisonResult) -> String {
    let mut out = String::new();

    out.push_str("## Comparison\n\n");

    let verdict = if result.are_equal() { "Equal" } else { "Different" };
    out.push_str(&format!(
        "**Verdict**: {verdict}  \n**Differences**: {}  \n**Invocation**: `{}`\n\n",
        result.differences().len(),
        result.invocation_id()
    ));

    if result.are_equal() {
        out.push_str("_No differences found._\n");
        return out;
    }

    out.push_str("### Differences\n\n");
    for difference in result.differences() {
        out.push_str(&format!(
            "- `{}`: `{}` vs `{}`\n",
            difference.short_item(),
            difference.left_value(),
            difference.right_value()
        ));
    }

    if result.exceeded_differences() {
        out.push_str(&format!(
            "\n_Stopped after {} difference(s); more may exist._\n",
            result.max_differences()
        ));
    }

    out
}
