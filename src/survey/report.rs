// Writing the charts to the output directory.

use std::fmt::Write as _;

use crate::survey::{io_common::chart_file_stem, *};

/// Writes one SVG file per chart, and an index page showing all of them in order.
///
/// Returns the paths of the files written.
pub fn write_charts(
    out_dir: &Path,
    report_title: &str,
    outcomes: &[GroupOutcome],
) -> SurveyResult<Vec<PathBuf>> {
    let out_display = out_dir.display().to_string();
    fs::create_dir_all(out_dir).context(WritingOutputSnafu {
        path: out_display.clone(),
    })?;

    let mut written: Vec<PathBuf> = Vec::new();
    let mut used_names: Vec<String> = Vec::new();
    let mut sections: Vec<(String, String)> = Vec::new();
    for o in outcomes.iter() {
        if let Ok((_, chart)) = &o.result {
            let file_name = unique_file_name(&chart_file_stem(&o.lead_name), &mut used_names);
            let p = out_dir.join(&file_name);
            debug!("write_charts: lead {:?} -> {:?}", o.lead_name, p);
            fs::write(&p, chart.to_svg()).context(WritingOutputSnafu {
                path: p.display().to_string(),
            })?;
            sections.push((o.lead_name.clone(), file_name));
            written.push(p);
        }
    }

    let index = out_dir.join("index.html");
    fs::write(&index, index_page(report_title, &sections, outcomes)).context(
        WritingOutputSnafu {
            path: index.display().to_string(),
        },
    )?;
    written.push(index);
    Ok(written)
}

// Two leads may map to the same file name ("J. Doe" and "J, Doe"). Names are compared
// without case, some filesystems do not tell "Bob.svg" and "bob.svg" apart.
fn unique_file_name(stem: &str, used_names: &mut Vec<String>) -> String {
    let mut name = format!("{}.svg", stem);
    let mut counter = 2;
    while used_names.contains(&name.to_lowercase()) {
        name = format!("{}-{}.svg", stem, counter);
        counter += 1;
    }
    used_names.push(name.to_lowercase());
    name
}

fn index_page(report_title: &str, sections: &[(String, String)], outcomes: &[GroupOutcome]) -> String {
    let mut html = String::new();
    let _ = writeln!(html, "<!DOCTYPE html>");
    let _ = writeln!(html, "<html>");
    let _ = writeln!(html, "<head>");
    let _ = writeln!(html, "  <meta charset='utf-8'>");
    let _ = writeln!(html, "  <title>{}</title>", escape_text(report_title));
    let _ = writeln!(html, "</head>");
    let _ = writeln!(html, "<body>");
    let _ = writeln!(html, "  <h1>{}</h1>", escape_text(report_title));
    for (lead_name, file_name) in sections.iter() {
        let _ = writeln!(html, "  <section>");
        let _ = writeln!(html, "    <h2>{}</h2>", escape_text(lead_name));
        let _ = writeln!(
            html,
            "    <img src='{}' alt='{}'/>",
            escape_text(file_name),
            escape_text(lead_name)
        );
        let _ = writeln!(html, "  </section>");
    }
    let failures: Vec<(&String, &ScoreErrors)> = outcomes
        .iter()
        .filter_map(|o| o.result.as_ref().err().map(|e| (&o.lead_name, e)))
        .collect();
    if !failures.is_empty() {
        let _ = writeln!(html, "  <ul class='errors'>");
        for (lead_name, e) in failures {
            let _ = writeln!(
                html,
                "    <li>{}: {}</li>",
                escape_text(lead_name),
                escape_text(&e.to_string())
            );
        }
        let _ = writeln!(html, "  </ul>");
    }
    let _ = writeln!(html, "</body>");
    let _ = writeln!(html, "</html>");
    html
}
