// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_post(size: usize) -> String {
    let base = "[quote=someone]Earlier [b]bold[/b] words[/quote]\n\
                Reply with [i]emphasis[/i], a [url=https://example.com]link[/url] and [color=#f00]colour[/color].\n\
                [list]\n[*]first\n[*]second [s]struck[/s]\n[/list]\n\
                [code]let x = [1, 2];[/code]\n\n";
    base.repeat(size)
}

#[allow(dead_code)]
pub fn generate_misnested(size: usize) -> String {
    let base = "[b]a[quote]q[i]r[/quote]s[/b]t[/i]\n[center][u]x[/center][/u]\n";
    base.repeat(size)
}

#[allow(dead_code)]
pub fn generate_deep(depth: usize) -> String {
    "[b][i]".repeat(depth / 2) + "deep" + &"[/i][/b]".repeat(depth / 2)
}
