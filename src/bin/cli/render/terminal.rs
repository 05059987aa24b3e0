use vokabel_lib::vocabulary::Bucket;

/// ANSI color codes
#[allow(dead_code)]
pub struct Color;

#[allow(dead_code)]
impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const GRAY: &str = "\x1b[90m";
}

/// Human label for a bucket
pub fn bucket_label(bucket: Bucket) -> &'static str {
    match bucket {
        Bucket::DontKnow => "don't know",
        Bucket::Learning => "learning",
        Bucket::Mastered => "mastered",
    }
}

pub fn bucket_color(bucket: Bucket) -> &'static str {
    match bucket {
        Bucket::DontKnow => Color::RED,
        Bucket::Learning => Color::YELLOW,
        Bucket::Mastered => Color::GREEN,
    }
}

/// Fixed-width bar of `width` cells filled to `value / total`
pub fn progress_bar(value: usize, total: usize, width: usize) -> String {
    let filled = if total == 0 {
        0
    } else {
        (value * width + total / 2) / total
    };
    let filled = filled.min(width);
    format!("{}{}", "\u{2588}".repeat(filled), "\u{2591}".repeat(width - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0, 0, 4), "\u{2591}\u{2591}\u{2591}\u{2591}");
        assert_eq!(progress_bar(5, 10, 4), "\u{2588}\u{2588}\u{2591}\u{2591}");
        assert_eq!(progress_bar(10, 10, 4), "\u{2588}\u{2588}\u{2588}\u{2588}");
    }
}
