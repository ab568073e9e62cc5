//! Map snapshots shared by unit, property, and CLI tests.

/// Hub with two spokes; three aliens on it exercise landing, moving, and
/// fighting within a short budget.
pub const HUB_MAP: &str = "Foo south=Baz north=Bam\nBaz\nBam\n";

/// Three cities without routes. Every alien that lands is trapped on its
/// next turn.
pub const ISOLATED_MAP: &str = "Foo\nBar\nBaz\n";

/// Three cities joined in a ring; a lone alien can walk forever.
pub const CYCLE_MAP: &str = "En north=Baz\nBaz east=Bam\nBam east=En\n";

/// A single city with no routes.
pub const SOLO_MAP: &str = "Solo\n";

/// Cities with mixed-case names and routes in every direction.
pub const MIXED_CASE_MAP: &str = "\
Foo north=Bar west=Baz south=Qu-ux
Bar south=Foo west=Bee
Baz east=Foo
Qu-ux north=Foo
Bee east=Bar
";
