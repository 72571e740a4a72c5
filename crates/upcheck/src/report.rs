//! Human-readable rendering of check results, as plain text or HTML.

use std::fmt::{self, Display, Formatter};

use upcheck_core::{ReleaseInfo, UpdateInfo};

use crate::controller::Results;
use crate::settings::OutputFormat;

const UNABLE_TO_CHECK: &str = "Unable to check for updates.";
const NO_UPDATE_AVAILABLE: &str = "No updates available.";
const NEW_UPDATE_AVAILABLE: &str = "New updates available:";
const DOWNLOAD_FORMATS: &str = "Download available in these formats:";
const MORE_INFORMATION: &str = "For more information, visit:";
const NEW_VERSION: &str = "New version: ";
const RELEASE_DATE: &str = "Release date: ";
const TAGS: &str = "Tags: ";
const TAGS_SEPARATOR: &str = ", ";
const TEXT_INDENT: &str = "    ";

#[must_use]
pub fn render(results: &Results, format: OutputFormat, show_tags: bool) -> String {
    match format {
        OutputFormat::Text => TextReport { results, show_tags }.to_string(),
        OutputFormat::Html => HtmlReport { results, show_tags }.to_string(),
    }
}

pub struct TextReport<'a> {
    pub results: &'a Results,
    pub show_tags: bool,
}

impl Display for TextReport<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if !self.results.was_check_successful {
            writeln!(f, "{UNABLE_TO_CHECK}")?;
            return writeln!(f, "{}", self.results.error_message);
        }

        let info = &self.results.update_info;
        if !info.is_update_available {
            return writeln!(f, "{NO_UPDATE_AVAILABLE}");
        }

        writeln!(f, "{NEW_UPDATE_AVAILABLE}")?;
        for release in &info.releases {
            writeln!(f)?;
            self.release(f, release)?;
        }
        Ok(())
    }
}

impl TextReport<'_> {
    fn release(&self, f: &mut Formatter<'_>, release: &ReleaseInfo) -> fmt::Result {
        writeln!(f, "{}", release.title)?;
        writeln!(f)?;
        writeln!(
            f,
            "{NEW_VERSION}{} ({})",
            release.version,
            release.release_type.as_str()
        )?;
        writeln!(f, "{RELEASE_DATE}{}", release.date)?;
        if self.show_tags {
            if release.tags.is_empty() {
                writeln!(f)?;
            } else {
                writeln!(f, "{TAGS}{}", release.tags.join(TAGS_SEPARATOR))?;
            }
        }

        if !release.download_links.is_empty() {
            writeln!(f)?;
            writeln!(f, "{DOWNLOAD_FORMATS}")?;
            for platform in &release.target_platforms {
                write!(f, "{TEXT_INDENT}{}:", platform.as_str())?;
                for link in &release.download_links {
                    write!(f, " [{}]", link.package_type.as_str())?;
                }
                writeln!(f)?;
            }
            for link in &release.download_links {
                writeln!(f, "{TEXT_INDENT}[{}] {}", link.package_type.as_str(), link.url)?;
            }
        }

        if !release.info_links.is_empty() {
            writeln!(f)?;
            writeln!(f, "{MORE_INFORMATION}")?;
            for link in &release.info_links {
                writeln!(f, "{TEXT_INDENT}- {} <{}>", link.page_description, link.url)?;
            }
        }
        Ok(())
    }
}

pub struct HtmlReport<'a> {
    pub results: &'a Results,
    pub show_tags: bool,
}

impl Display for HtmlReport<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if !self.results.was_check_successful {
            return write!(
                f,
                "{UNABLE_TO_CHECK}<br/>{}",
                Escaped(&self.results.error_message)
            );
        }
        self.update_info(f, &self.results.update_info)
    }
}

impl HtmlReport<'_> {
    fn update_info(&self, f: &mut Formatter<'_>, info: &UpdateInfo) -> fmt::Result {
        if !info.is_update_available {
            return write!(f, "{NO_UPDATE_AVAILABLE}<br/>");
        }

        write!(f, "{NEW_UPDATE_AVAILABLE}<br/><br/>")?;
        for release in &info.releases {
            self.release(f, release)?;
        }
        Ok(())
    }

    fn release(&self, f: &mut Formatter<'_>, release: &ReleaseInfo) -> fmt::Result {
        write!(f, "<strong>{}</strong><br/><br/>", Escaped(&release.title))?;
        write!(
            f,
            "{NEW_VERSION}{} ({})<br/>",
            release.version,
            release.release_type.as_str()
        )?;
        write!(f, "{RELEASE_DATE}{}<br/>", Escaped(&release.date))?;
        if self.show_tags {
            if !release.tags.is_empty() {
                write!(f, "{TAGS}{}", Escaped(&release.tags.join(TAGS_SEPARATOR)))?;
            }
            write!(f, "<br/>")?;
        }
        write!(f, "<br/>")?;

        if !release.download_links.is_empty() {
            write!(f, "{DOWNLOAD_FORMATS}<br/>")?;
            for platform in &release.target_platforms {
                write!(
                    f,
                    "<div style=\"text-indent: 40px;\">{}:",
                    platform.as_str()
                )?;
                for link in &release.download_links {
                    write!(f, " [")?;
                    anchor(f, &link.url, link.package_type.as_str())?;
                    write!(f, "]")?;
                }
                write!(f, "</div>")?;
            }
            write!(f, "<br/>")?;
        }

        if !release.info_links.is_empty() {
            write!(f, "{MORE_INFORMATION}<ul>")?;
            for link in &release.info_links {
                write!(f, "<li>")?;
                anchor(f, &link.url, &link.page_description)?;
                write!(f, "</li>")?;
            }
            write!(f, "</ul>")?;
        }
        Ok(())
    }
}

/// Link whose tooltip is the full URL, so two packages of the same type can
/// be told apart.
fn anchor(f: &mut Formatter<'_>, url: &str, label: &str) -> fmt::Result {
    write!(
        f,
        "<a href=\"{}\" title=\"{}\">{}</a>",
        Escaped(url),
        Escaped(url),
        Escaped(label)
    )
}

struct Escaped<'a>(&'a str);

impl Display for Escaped<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for ch in self.0.chars() {
            match ch {
                '&' => f.write_str("&amp;")?,
                '<' => f.write_str("&lt;")?,
                '>' => f.write_str("&gt;")?,
                '"' => f.write_str("&quot;")?,
                '\'' => f.write_str("&#39;")?,
                _ => write!(f, "{ch}")?,
            }
        }
        Ok(())
    }
}
