//! `claimsim variants`

use claims_engine::Variant;
use colored::Colorize;

pub fn execute() {
    println!("{}", "Generator variants".bright_white().bold());
    for variant in Variant::ALL {
        let bounds = variant.config().rows;
        println!(
            "  {:<12} {}",
            variant.name().bright_cyan(),
            variant.description()
        );
        println!(
            "  {:<12} {}",
            "",
            format!(
                "rows {}..={} (default {}, step {})",
                bounds.min, bounds.max, bounds.default, bounds.step
            )
            .dimmed()
        );
    }
}
