use cellforth_core::Colors;

use crate::dump::{layouts, render};
use crate::test_utils::bar_foo;

#[test]
fn render_plain() {
    let (registry, _) = bar_foo();

    insta::assert_snapshot!(render(&registry, Colors::OFF), @r"
    # bar (24 bytes)
      +0   x: cell
      +8   y: cell
      +16  z: cell
    ;
    # foo (24 bytes)
      +0   a: cell
      +8   b: cell
      +16  c: bar.new
    ;
    ");
}

#[test]
fn render_colored_wraps_names() {
    let (registry, _) = bar_foo();
    let out = render(&registry, Colors::ON);

    assert!(out.starts_with("# \x1b[34mbar\x1b[0m \x1b[2m(24 bytes)\x1b[0m\n"));
}

#[test]
fn layouts_as_json() {
    let (registry, _) = bar_foo();
    let json = serde_json::to_string_pretty(&layouts(&registry)[1]).unwrap();

    insta::assert_snapshot!(json, @r#"
    {
      "name": "foo",
      "size": 24,
      "fields": [
        {
          "name": "a",
          "offset": 0,
          "size": 8,
          "type": "cell"
        },
        {
          "name": "b",
          "offset": 8,
          "size": 8,
          "type": "cell"
        },
        {
          "name": "c",
          "offset": 16,
          "size": 8,
          "type": "bar",
          "initializer": "bar.new"
        }
      ]
    }
    "#);
}
