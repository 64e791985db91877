//! CMake definitions every compiled script relies on.
//!
//! `render` appends to the file named by `RENDER_FILE`. Filters are macros so
//! they can rewrite `IT` in the caller's scope.

pub const PRELUDE: &str = r#"cmake_minimum_required(VERSION 3.20)

function(render content)
  file(APPEND "${RENDER_FILE}" "${content}")
endfunction()

macro(template_filter_upper)
  string(TOUPPER "${IT}" IT)
endmacro()

macro(template_filter_lower)
  string(TOLOWER "${IT}" IT)
endmacro()

macro(template_filter_strip)
  string(STRIP "${IT}" IT)
endmacro()

macro(template_filter_reverse)
  list(REVERSE IT)
endmacro()

macro(template_filter_join glue)
  list(JOIN IT "${glue}" IT)
endmacro()
"#;

/// Number of lines the prelude occupies before the compiled script starts.
pub fn line_count() -> u32 {
    PRELUDE.bytes().filter(|&b| b == b'\n').count() as u32
}
