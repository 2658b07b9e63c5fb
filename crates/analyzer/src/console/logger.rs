use console::style;
use indicatif::{ProgressBar, ProgressStyle};

pub struct Console;

impl Console {
    const fn get_width() -> usize {
        44
    }

    fn horizontal_border() -> String {
        "═".repeat(Self::get_width())
    }

    pub fn section(title: &str) {
        println!();
        let width = Self::get_width();
        let formatted_title = format!("{title:^width$}");
        let border = Self::horizontal_border();

        println!("{}", style(format!("╔{border}╗")).cyan().bold());
        println!("{}", style(formatted_title).cyan().bold());
        println!("{}", style(format!("╚{border}╝")).cyan().bold());
    }

    pub fn info(label: &str, value: &str) {
        println!("{}: {}", style(label).dim().cyan(), style(value).white());
    }

    pub fn success(text: &str) {
        println!("{} {}", style("✓").green().bold(), style(text).green());
    }

    pub fn warning(text: &str) {
        println!("{} {}", style("⚠").yellow().bold(), style(text).yellow());
    }

    pub fn user_error(text: &str) {
        eprintln!("{} {}", style("✗").red().bold(), style(text).red());
    }

    /// Progress bar for `total` wallets. Lines printed through
    /// [`ProgressBar::println`] appear above the bar.
    pub fn progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        let template = "{msg} [{elapsed_precise}] {wide_bar:.cyan/blue} {pos}/{len} ({per_sec}, eta {eta})";
        match ProgressStyle::with_template(template) {
            Ok(progress_style) => pb.set_style(progress_style.progress_chars("█▉▊▋▌▍▎▏ ")),
            Err(e) => log::debug!("Invalid progress template: {e}"),
        }
        pb.set_message("Processing");
        pb
    }
}
