//! Integration tests for shortcode resolution

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use pretty_assertions::assert_eq;
use shortcode::processor::MAX_RECURSION_LEVEL;
use shortcode::{
    Config, HandlerContainer, ProcessedShortcode, Processor, ProcessorError, TemplateHandler,
};

fn handlers() -> HandlerContainer {
    let mut handlers = HandlerContainer::new();
    handlers
        .add("name", |s, _| Some(s.name().to_string()))
        .unwrap();
    handlers
        .add("content", |s, _| s.content().map(str::to_string))
        .unwrap();
    handlers
        .add("reverse", |s, _| {
            s.content().map(|c| c.chars().rev().collect::<String>())
        })
        .unwrap();
    handlers
        .add("url", |s, _| {
            let url = s.parameter("url").or(s.bbcode())?;
            let text = s.content().filter(|c| !c.is_empty()).unwrap_or(url);
            Some(format!(r#"<a href="{url}">{text}</a>"#))
        })
        .unwrap();
    handlers.add_alias("c", "content").unwrap();
    handlers.add_alias("n", "name").unwrap();
    handlers
}

fn processor() -> Processor {
    Processor::new(handlers())
}

#[test]
fn test_replacements() {
    let cases = [
        ("[name]", "name"),
        ("[content]random[/content]", "random"),
        ("[name]random[/other]", "namerandom[/other]"),
        ("[name][other]random[/other]", "name[other]random[/other]"),
        ("[content]random-[name]-random[/content]", "random-name-random"),
        ("x [c]a-[n][/n]-b[/c] y", "x a-n-b y"),
        ("x [content]a-[c]v[/c]-b[/content] y", "x a-v-b y"),
        ("x [html]bold[/html] z", "x [html]bold[/html] z"),
        ("x [reverse]abc xyz[/reverse] z", "x zyx cba z"),
        (
            "x [i /][i]i[/i][i /][i]i[/i][i /] z",
            "x [i /][i]i[/i][i /][i]i[/i][i /] z",
        ),
        (
            r#"[url url="http://giggle.com/search" /]"#,
            r#"<a href="http://giggle.com/search">http://giggle.com/search</a>"#,
        ),
        (
            r#"[url="http://giggle.com/search" /]"#,
            r#"<a href="http://giggle.com/search">http://giggle.com/search</a>"#,
        ),
        (
            r#"[url="http://giggle.com/search"]Giggle[/url]"#,
            r#"<a href="http://giggle.com/search">Giggle</a>"#,
        ),
    ];

    let processor = processor();
    for (input, expected) in cases {
        assert_eq!(processor.process(input), expected, "input: {input}");
    }
}

#[test]
fn test_unregistered_wrapper_stays_verbatim() {
    let text = r#" [x value=" [name]yyy[/name] "] [name]yyy[/name] [/x] "#;
    assert_eq!(processor().process(text), text);
}

#[test]
fn test_unregistered_wrapper_still_runs_nested_handlers() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let mut handlers = HandlerContainer::new();
    handlers
        .add("count", move |_, _| {
            counter.fetch_add(1, Ordering::Relaxed);
            Some("counted".to_string())
        })
        .unwrap();
    let processor = Processor::new(handlers);

    let text = "[x]a [count /] b[/x] [count /]";
    assert_eq!(processor.process(text), "[x]a [count /] b[/x] counted");
    assert_eq!(calls.load(Ordering::Relaxed), 2);
}

#[test]
fn test_parameters_by_position() {
    let mut handlers = HandlerContainer::new();
    handlers
        .add("arg", |s, _| {
            Some(format!(
                "{}|{}",
                s.parameter_at(0).unwrap_or("-"),
                s.parameter_at(1).unwrap_or("-")
            ))
        })
        .unwrap();
    let processor = Processor::new(handlers);

    assert_eq!(processor.process("[arg x=1 y=2 /]"), "1|2");
    assert_eq!(processor.process("[arg flag y=2 /]"), "-|2");
    assert_eq!(processor.process("[arg /]"), "-|-");
}

#[test]
fn test_deep_nesting_stops_at_recursion_cap() {
    let deepest = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&deepest);
    let mut handlers = HandlerContainer::new();
    handlers
        .add("c", move |s, _| {
            seen.fetch_max(s.recursion_level(), Ordering::Relaxed);
            s.content().map(str::to_string)
        })
        .unwrap();

    let depth = MAX_RECURSION_LEVEL + 44;
    let text = format!("{}{}", "[c]".repeat(depth), "[/c]".repeat(depth));
    for processor in [
        Processor::new(handlers.clone()),
        Processor::new(handlers.clone()).with_recursion_depth(Some(usize::MAX)),
    ] {
        let output = processor.process(&text);
        assert!(output.len() < text.len());
        assert!(deepest.load(Ordering::Relaxed) <= MAX_RECURSION_LEVEL);
    }
}

#[test]
fn test_unicode_text_around_replacements() {
    assert_eq!(
        processor().process("zażółć [reverse]gęślą[/reverse] jaźń [name /]"),
        "zażółć ąlśęg jaźń name"
    );
}

#[test]
fn test_parent_is_passed_to_handlers() {
    let describe = |s: &ProcessedShortcode, parent: Option<&ProcessedShortcode>| {
        let parent = parent.map_or("root", |p| p.name());
        Some(format!("{}[{}]", parent, s.content().unwrap_or("")))
    };
    let mut handlers = HandlerContainer::new();
    handlers.add("outer", describe).unwrap();
    handlers.add("inner", describe).unwrap();
    handlers.add("level", describe).unwrap();
    let processor = Processor::new(handlers);

    let text = "x [outer]a [inner]c [level]x[/level] d[/inner] b[/outer] y";
    let expected = "x root[a outer[c inner[x] d] b] y";
    assert_eq!(processor.process(text), expected);
    assert_eq!(
        processor.process(&format!("{text}{text}")),
        format!("{expected}{expected}")
    );
}

#[test]
fn test_recursion_depth_zero() {
    let processor = processor().with_recursion_depth(Some(0));
    assert_eq!(
        processor.process("x [content]a-[name][/name]-b[/content] y"),
        "x a-[name][/name]-b y"
    );
}

#[test]
fn test_auto_process_disabled() {
    let processor = processor().with_auto_process_content(false);
    assert_eq!(
        processor.process("x [content]a-[name][/name]-b[/content] y"),
        "x a-[name][/name]-b y"
    );
}

#[test]
fn test_recursion_depth_limits_nesting() {
    let processor = processor().with_recursion_depth(Some(1));
    assert_eq!(
        processor.process("[c]1[c]2[c]3[/c][/c][/c]"),
        "12[c]3[/c]"
    );
}

fn position_processor() -> Processor {
    let mut handlers = HandlerContainer::new();
    handlers
        .add("p", |s, _| Some(s.position().to_string()))
        .unwrap();
    handlers
        .add("n", |s, _| Some(s.name_position().to_string()))
        .unwrap();
    Processor::new(handlers)
}

#[test]
fn test_positions() {
    let processor = position_processor();
    assert_eq!(processor.process("[n][n][n]"), "123");
    assert_eq!(processor.process("[p][p][p]"), "123");
    assert_eq!(processor.process("[p][n][p][n][p][n]"), "113253");
    assert_eq!(processor.process("[p][p][p][n][p][p][p]"), "1231567");
}

fn iteration_processor(max_iterations: Option<usize>) -> Processor {
    let mut handlers = handlers();
    handlers.add_alias("d", "c").unwrap();
    handlers.add_alias("e", "c").unwrap();
    Processor::new(handlers)
        .with_recursion_depth(Some(0))
        .with_max_iterations(max_iterations)
        .unwrap()
}

#[test]
fn test_iterations() {
    let processor = iteration_processor(Some(2));
    assert_eq!(processor.process("x [c]a[/c] y"), "x a y");
    assert_eq!(processor.process("x [c]a[d]b[/d]c[/c] y"), "x abc y");
    assert_eq!(
        processor.process("x [c]a[d]b[e]c[/e]d[/d]e[/c] y"),
        "x ab[e]c[/e]de y"
    );

    let processor = iteration_processor(None);
    assert_eq!(
        processor.process("x [c]a[d]b[e]c[/e]d[/d]e[/c] y"),
        "x abcde y"
    );
}

#[test]
fn test_iteration_number_is_reported() {
    let mut handlers = HandlerContainer::new();
    handlers
        .add("again", |s, _| {
            Some(match s.iteration() {
                1 => "[again/]".to_string(),
                n => n.to_string(),
            })
        })
        .unwrap();
    let processor = Processor::new(handlers).with_max_iterations(None).unwrap();
    assert_eq!(processor.process("[again /]"), "2");
}

#[test]
fn test_zero_iterations_rejected() {
    let result = processor().with_max_iterations(Some(0));
    assert!(matches!(
        result,
        Err(ProcessorError::InvalidArgument {
            setting: "max_iterations",
            ..
        })
    ));
}

#[test]
fn test_default_handler() {
    let mut handlers = handlers();
    handlers.set_default(|s, _| Some(s.name().to_string()));
    let processor = Processor::new(handlers);
    assert_eq!(processor.process("[name][other][/name][random]"), "namerandom");
}

#[test]
fn test_fixed_point_stops_unbounded_iterations() {
    let mut handlers = HandlerContainer::new();
    handlers
        .add("self", |_, _| Some("[self]".to_string()))
        .unwrap();
    handlers
        .add("other", |_, _| Some("[self]".to_string()))
        .unwrap();
    handlers
        .add("random", |_, _| Some("[various]".to_string()))
        .unwrap();
    let processor = Processor::new(handlers).with_max_iterations(None).unwrap();

    assert_eq!(processor.process("[self]"), "[self]");
    assert_eq!(processor.process("[other]"), "[self]");
    assert_eq!(processor.process("[random]"), "[various]");
}

#[test]
fn test_absolute_offset() {
    let mut handlers = handlers();
    handlers
        .add("y", |s, _| Some(s.absolute_offset().to_string()))
        .unwrap();
    let processor = Processor::new(handlers);
    assert_eq!(processor.process("ab [content]cd [y /][/content]"), "ab cd 15");
    assert_eq!(processor.process("ab [c]cd [y /][/c]"), "ab cd 9");
}

#[test]
fn test_recursion_level_and_raw_content() {
    let mut handlers = handlers();
    handlers
        .add("level", |s, _| Some(s.recursion_level().to_string()))
        .unwrap();
    handlers
        .add("raw", |s, _| {
            let raw = s.shortcode().content.clone().unwrap_or_default();
            Some(format!("{}|{}", raw, s.content().unwrap_or("")))
        })
        .unwrap();
    let processor = Processor::new(handlers);

    assert_eq!(processor.process("[level /] [c][c][level /][/c][/c]"), "0 2");
    assert_eq!(processor.process("[raw][name /][/raw]"), "[name /]|name");
}

#[test]
fn test_template_handlers() {
    let mut handlers = HandlerContainer::new();
    handlers
        .add_handler("link", TemplateHandler::new(r#"<a href="%href%">%content%</a>"#))
        .unwrap();
    handlers
        .add_handler("b", TemplateHandler::new("<b>%content%</b>"))
        .unwrap();
    let processor = Processor::new(handlers);

    assert_eq!(
        processor.process(r#"see [link href="/docs"][b]docs[/b][/link]"#),
        r#"see <a href="/docs"><b>docs</b></a>"#
    );
}

#[test]
fn test_processor_from_config() {
    let config = Config::from_toml_str(
        r#"
        default = ""

        [syntax]
        opening_tag = "{"
        closing_tag = "}"

        [processor]
        max_iterations = "unbounded"

        [handlers]
        greet = "Hello, %who%!"
        wrap = "{greet who=%content% /}"
        "#,
    )
    .unwrap();
    let processor = config.build_processor().unwrap();

    assert_eq!(processor.process("{wrap}World{/wrap}"), "Hello, World!");
    assert_eq!(processor.process("[wrap] {unknown /}"), "[wrap] ");
}

#[test]
fn test_processor_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Processor>();

    let processor = processor();
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| processor.process("[reverse]ab[/reverse]")))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), "ba");
        }
    });
}
