//! Catch2 test file generation
//!
//! Renders a [`TestSuite`] into a C++ source file with one `TEST_CASE` per
//! reference vector. Each case feeds the ECEF position and decimal year to
//! the field routine and checks every ECEF field component, scaled to nT,
//! against the reference within the suite margin.

pub mod format;

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};

use crate::coordinates::EcefCase;
use crate::vectors::TestSuite;
use crate::{io_err, Result};
pub use format::float_literal;

/// Name the generated files credit as their source
pub const GENERATOR_NAME: &str = "wmmtestgen";

/// Assertion style used for each field component
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum CheckStyle {
    /// `CHECK( out*1E9 == Approx(truth*1E9).margin(m) );`
    #[default]
    Approx,
    /// `CHECK( std::abs(out*1E9 - truth*1E9) <= (m) );`
    Abs,
}

/// Derives the generated file name from the header under test
///
/// `geomag.h` becomes `geomag_test.cpp`, next to the header.
pub fn default_output_path(header: &Path) -> PathBuf {
    let stem = header
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    header.with_file_name(format!("{}_test.cpp", stem))
}

/// Renders and writes the test file for one suite
#[derive(Debug, Clone)]
pub struct Generator {
    suite: TestSuite,
    include_prefix: String,
    generated_on: String,
}

impl Generator {
    /// Creates a generator stamped with today's date
    pub fn new(suite: TestSuite) -> Self {
        Generator {
            suite,
            include_prefix: "../".to_string(),
            generated_on: chrono::Local::now().format("%d %b %Y").to_string(),
        }
    }

    /// Overrides the date written into the file header
    pub fn with_date(mut self, date: chrono::NaiveDate) -> Self {
        self.generated_on = date.format("%d %b %Y").to_string();
        self
    }

    /// Sets the directory prefix used in the `#include` of the header
    pub fn with_include_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.include_prefix = prefix.into();
        self
    }

    /// Where `write` puts the file
    pub fn output_path(&self) -> PathBuf {
        default_output_path(&self.suite.header)
    }

    /// Renders the complete C++ source
    pub fn render(&self) -> Result<String> {
        let cases = self.suite.ecef_cases()?;
        let file_name = self
            .output_path()
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut out = self.preamble(&file_name);
        for case in &cases {
            out.push_str(&self.test_case(case)?);
        }
        Ok(out)
    }

    /// Writes the rendered source next to the header and returns the case count
    pub fn write(&self) -> Result<usize> {
        self.write_to(self.output_path())
    }

    /// Writes the rendered source to `path`, creating parent directories
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<usize> {
        let path = path.as_ref();
        let source = self.render()?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
        }
        fs::write(path, source).map_err(|e| io_err(path, e))?;

        let count = self.suite.vectors.len();
        info!("Wrote {} test cases to {}", count, path.display());
        Ok(count)
    }

    fn preamble(&self, file_name: &str) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail
        let _ = write!(
            out,
            r#"// {file} Generated by {generator}
/** \file
 * \date {date}
 * \brief c++ catch2 tests for magnetic field header only library.
 * \details Compile with g++ {file} -std=c++1z
 */

// This tells Catch to provide a main() - only do this in one cpp file
#define CATCH_CONFIG_MAIN
#include "catch.hpp"
"#,
            file = file_name,
            generator = GENERATOR_NAME,
            date = self.generated_on,
        );
        if self.suite.check == CheckStyle::Abs {
            out.push_str("#include <cmath>\n");
        }
        let _ = write!(
            out,
            "\nextern \"C\" {{\n    #include \"{}{}\"\n}}\n\n",
            self.include_prefix,
            self.suite.header.display()
        );
        out
    }

    fn test_case(&self, case: &EcefCase) -> Result<String> {
        let p = &case.position_m;
        let b = &case.field_t;
        let margin = float_literal(self.suite.margin)?;

        let mut out = String::new();
        let _ = writeln!(
            out,
            "TEST_CASE( \"geomag test {} of {} model\", \"{}\" ) {{",
            case.index, self.suite.model, self.suite.tag
        );
        let _ = writeln!(
            out,
            "    const double in[3] = {{{}, {}, {}}};",
            float_literal(p.x)?,
            float_literal(p.y)?,
            float_literal(p.z)?
        );
        out.push_str("    double out[3];\n");
        let _ = writeln!(
            out,
            "    double truth[3] = {{{}, {}, {}}};",
            float_literal(b.x)?,
            float_literal(b.y)?,
            float_literal(b.z)?
        );
        let _ = writeln!(
            out,
            "    {}({}, &in, &out);",
            self.suite.routine,
            float_literal(case.date)?
        );
        for k in 0..3 {
            let check = match self.suite.check {
                CheckStyle::Approx => format!(
                    "    CHECK( out[{k}]*1E9 == Approx(truth[{k}]*1E9).margin({m}) );",
                    k = k,
                    m = margin
                ),
                CheckStyle::Abs => format!(
                    "    CHECK( std::abs(out[{k}]*1E9 - truth[{k}]*1E9) <= ({m}) );",
                    k = k,
                    m = margin
                ),
            };
            out.push_str(&check);
            out.push('\n');
        }
        out.push_str("}\n\n");
        Ok(out)
    }
}
