/// Span IDs for performance-logging events.  Each ID must be unique;
/// simply increment when adding a new span.
pub const ENHANCE: u64 = 1;
pub const RESTRUCTURE: u64 = 2;
pub const BIND_TOGGLES: u64 = 3;
pub const REWRITE_LINKS: u64 = 4;
pub const AUGMENT_CODE_BLOCKS: u64 = 5;
pub const OBSERVE_LAZY_IMAGES: u64 = 6;
pub const COPY_CODE: u64 = 7;

pub fn name(span_id: u64) -> &'static str {
    match span_id {
        ENHANCE => "ENHANCE",
        RESTRUCTURE => "RESTRUCTURE",
        BIND_TOGGLES => "BIND_TOGGLES",
        REWRITE_LINKS => "REWRITE_LINKS",
        AUGMENT_CODE_BLOCKS => "AUGMENT_CODE_BLOCKS",
        OBSERVE_LAZY_IMAGES => "OBSERVE_LAZY_IMAGES",
        COPY_CODE => "COPY_CODE",
        _ => "UNKNOWN",
    }
}
