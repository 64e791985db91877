//! Filter pipelines: `@value | filter | foreach | filter | endforeach@`.
//!
//! The value is captured in `IT`; each stage either calls
//! `template_filter_<stage>` on it or opens/closes a loop over it. Loops
//! collect their per-element results in `foreach_IT_<depth>`.

use crate::cursor::{CharSet, Cursor, SPACE};
use crate::directive::reference_expr;
use crate::emit::Emitter;
use crate::error::{CompileError, CompileResult};
use crate::strings::skipping_strings_find_first;

const STAGE_END: CharSet = CharSet::of(b"@|");

/// Compile a pipeline. `begin` is just past the opening `@`, `bar` on the
/// first `|`. Returns the position after the closing `@`, or the end.
pub(crate) fn compile_pipeline<'a>(
    begin: Cursor<'a>,
    bar: Cursor<'a>,
    out: &mut Emitter<'_>,
) -> CompileResult<Cursor<'a>> {
    out.annotate("pipeline init", begin, bar);
    out.statement(&format!("set(IT {})\n", reference_expr(begin)), begin.span_to(bar));

    let strict = out.options().strict_foreach;
    let mut depth = 0usize;
    let mut end = bar;
    loop {
        let stage_begin = end.advanced().find_first(!SPACE);
        end = skipping_strings_find_first(STAGE_END, stage_begin);
        let stage = stage_begin.view_to(end);
        let span = stage_begin.span_to(end);

        match stage.trim_end() {
            "foreach" => {
                out.annotate("pipeline foreach", stage_begin, end);
                out.statement(
                    &format!("set(foreach_IT_{depth})\nforeach(IT ${{IT}})\n"),
                    span,
                );
                depth += 1;
            }
            "endforeach" => {
                if depth == 0 && strict {
                    return Err(CompileError::unmatched_endforeach(span));
                }
                depth = depth.saturating_sub(1);
                out.annotate("pipeline endforeach", stage_begin, end);
                out.statement(
                    &format!(
                        "list(APPEND foreach_IT_{depth} \"${{IT}}\")\nendforeach()\n\
                         set(IT \"${{foreach_IT_{depth}}}\")\n"
                    ),
                    span,
                );
            }
            _ => {
                out.annotate("pipeline filter", stage_begin, end);
                out.statement(&format!("template_filter_{stage}\n"), span);
            }
        }

        if end.peek() != b'|' {
            break;
        }
    }

    if depth != 0 && strict {
        return Err(CompileError::unclosed_foreach(depth, begin.span_to(end)));
    }

    out.annotate("pipeline output", end, end);
    out.statement("render(\"${IT}\")\n", end.span_to(end));

    Ok(if end.is_at_end() { end } else { end.advanced() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompileErrorCode;
    use crate::CompileOptions;
    use pretty_assertions::assert_eq;
    use source_map::Span;

    fn run(source: &str, options: &CompileOptions) -> CompileResult<(String, usize)> {
        let mut out = Emitter::new(options);
        let begin = Cursor::new(source);
        let bar = begin.find_first(STAGE_END);
        let end = compile_pipeline(begin, bar, &mut out)?;
        Ok((out.finish().0, end.offset()))
    }

    fn statements(source: &str) -> CompileResult<(String, usize)> {
        run(source, &CompileOptions::default().with_annotations(false))
    }

    #[test]
    fn test_filters_in_order() {
        assert_eq!(
            statements("value | upper() | reverse()@ tail").unwrap(),
            (
                "set(IT \"${value}\")\n\
                 template_filter_upper() \n\
                 template_filter_reverse()\n\
                 render(\"${IT}\")\n"
                    .into(),
                28
            )
        );
    }

    #[test]
    fn test_foreach_expansion() {
        assert_eq!(
            statements("list|foreach|upper()|endforeach@").unwrap().0,
            "set(IT \"${list}\")\n\
             set(foreach_IT_0)\n\
             foreach(IT ${IT})\n\
             template_filter_upper()\n\
             list(APPEND foreach_IT_0 \"${IT}\")\n\
             endforeach()\n\
             set(IT \"${foreach_IT_0}\")\n\
             render(\"${IT}\")\n"
        );
    }

    #[test]
    fn test_nested_foreach_uses_depth() {
        let (script, _) =
            statements("rows | foreach | foreach | endforeach | endforeach@").unwrap();
        let accumulators: Vec<&str> = script
            .lines()
            .filter(|line| line.contains("foreach_IT_"))
            .collect();
        assert_eq!(
            accumulators,
            vec![
                "set(foreach_IT_0)",
                "set(foreach_IT_1)",
                "list(APPEND foreach_IT_1 \"${IT}\")",
                "set(IT \"${foreach_IT_1}\")",
                "list(APPEND foreach_IT_0 \"${IT}\")",
                "set(IT \"${foreach_IT_0}\")",
            ]
        );
    }

    #[test]
    fn test_sequential_loops_reuse_depth() {
        let (script, _) =
            statements("x | foreach | endforeach | foreach | endforeach@").unwrap();
        let loop_body = "set(foreach_IT_0)\n\
                         foreach(IT ${IT})\n\
                         list(APPEND foreach_IT_0 \"${IT}\")\n\
                         endforeach()\n\
                         set(IT \"${foreach_IT_0}\")\n";
        assert_eq!(
            script,
            format!("set(IT \"${{x}}\")\n{loop_body}{loop_body}render(\"${{IT}}\")\n")
        );
    }

    #[test]
    fn test_filter_arguments_may_contain_markers() {
        let (script, end) = statements(r#"x | join("|@|")@!"#).unwrap();
        assert!(script.contains("template_filter_join(\"|@|\")\n"));
        assert_eq!(end, 16);
    }

    #[test]
    fn test_unterminated_pipeline_stops_at_end() {
        let (script, end) = statements("x | upper()").unwrap();
        assert!(script.ends_with("template_filter_upper()\nrender(\"${IT}\")\n"));
        assert_eq!(end, 11);
    }

    #[test]
    fn test_unmatched_endforeach_is_an_error() {
        let err = statements("x | endforeach@").unwrap_err();
        assert_eq!(err.code, CompileErrorCode::UnmatchedEndforeach);
        assert_eq!(err.span, Span::new(4, 14));
    }

    #[test]
    fn test_unclosed_foreach_is_an_error() {
        let err = statements("x | foreach | upper()@").unwrap_err();
        assert_eq!(err.code, CompileErrorCode::UnclosedForeach);
        assert_eq!(err.span, Span::new(0, 21));
    }

    #[test]
    fn test_lenient_mode_accepts_unbalanced_loops() {
        let options = CompileOptions::default()
            .with_annotations(false)
            .with_strict_foreach(false);
        let (script, _) = run("x | endforeach | foreach@", &options).unwrap();
        assert!(script.contains("list(APPEND foreach_IT_0 \"${IT}\")\n"));
        assert!(script.contains("set(foreach_IT_0)\n"));
    }

    #[test]
    fn test_stage_annotations() {
        let (script, _) = run("v | f()@", &CompileOptions::default()).unwrap();
        let labels: Vec<&str> = script
            .lines()
            .filter(|line| line.starts_with("# pipeline"))
            .collect();
        assert_eq!(
            labels,
            vec![
                "# pipeline init 1:1-1:3",
                "# pipeline filter 1:5-1:8",
                "# pipeline output 1:8-1:8",
            ]
        );
    }
}
