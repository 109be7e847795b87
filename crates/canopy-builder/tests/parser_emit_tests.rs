//! Integration tests for the parser-specific emitters.
//!
//! Tests validate:
//! - Packrat cache read/store pattern
//! - Furthest-failure recording and its tie-break condition
//! - Syntax node construction and rule tagging
//! - Parser class and export wiring
//! - A complete generated module: balanced, evenly indented, deterministic

use canopy_builder::parser::{cache_table, reader_name, OFFSET};
use canopy_builder::{expr, BuildError, BuildResult, Builder, Scope};
use canopy_types::{ClassDescriptor, RuleName, RuleTag};

// ══════════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════════

fn emit<F>(emit: F) -> String
where
    F: FnOnce(&mut Scope<'_>) -> BuildResult<()>,
{
    let mut builder = Builder::new();
    emit(&mut builder.root()).unwrap_or_else(|e| panic!("emission failed: {e}"));
    builder.into_string()
}

fn rule(name: &str) -> RuleName {
    RuleName::parse(name).expect("valid rule name")
}

fn tag(name: &str) -> RuleTag {
    RuleTag::parse(name).expect("valid tag")
}

/// Check that brackets balance outside of single-quoted strings.
fn assert_balanced(text: &str) {
    let mut stack = Vec::new();
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\'' => {
                while let Some(c) = chars.next() {
                    match c {
                        '\\' => {
                            chars.next();
                        }
                        '\'' => break,
                        _ => {}
                    }
                }
            }
            '(' | '[' | '{' => stack.push(ch),
            ')' | ']' | '}' => {
                let open = stack.pop().unwrap_or_else(|| panic!("unmatched {ch}"));
                let expected = match ch {
                    ')' => '(',
                    ']' => '[',
                    _ => '{',
                };
                assert_eq!(open, expected, "mismatched {ch}");
            }
            _ => {}
        }
    }
    assert!(stack.is_empty(), "unclosed: {stack:?}");
}

/// Emit the module for a tiny grammar:
///
/// ```text
/// grammar Digits
///   number <- [0-9]+ <Number>
/// ```
fn digits_module(name: &str) -> String {
    emit(|b| {
        b.package(name, |b| {
            b.syntax_node_class()?;
            b.grammar_module(|b| {
                let number = rule("number");
                b.method(&reader_name(&number), &[], |b| {
                    b.cache(&number, |b, address| {
                        let vars = b.locals(&[
                            ("index", OFFSET),
                            ("elements", expr::empty_list()),
                            ("text", expr::empty_string()),
                        ]);
                        let (index, elements, text) = (&vars[0], &vars[1], &vars[2]);
                        let digit = b.local("address", expr::true_lit());
                        b.while_block(&digit, |b| {
                            let chunk = b.chunk("1")?;
                            b.if_else(
                                &expr::and(&format!("{chunk} !== null"), &expr::regex_match("^[0-9]", &chunk)),
                                |b| {
                                    b.syntax_node(&digit, None, &chunk, "1", None, None);
                                    Ok(())
                                },
                                |b| b.failure(&digit, "[0-9]"),
                            )?;
                            b.if_block(&digit, |b| {
                                b.append(elements, &digit);
                                b.concat_text(text, &digit);
                                Ok(())
                            })
                        })?;
                        b.if_else(
                            &format!("{} >= 1", expr::string_length(elements)),
                            |b| {
                                b.assign(OFFSET, index);
                                b.syntax_node(
                                    address,
                                    Some(&tag("Number")),
                                    text,
                                    &expr::string_length(text),
                                    Some(elements.as_str()),
                                    None,
                                );
                                Ok(())
                            },
                            |b| {
                                b.assign(OFFSET, index);
                                b.assign(address, expr::null_lit());
                                Ok(())
                            },
                        )
                    })
                })
            })?;
            b.parser_class(&rule("number"))?;
            b.exports()
        })
    })
}

// ══════════════════════════════════════════════════════════════════════════════
// Packrat cache
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn cache_pattern() {
    let text = emit(|b| {
        b.cache(&rule("foo"), |b, address| {
            b.syntax_node(address, None, "'x'", "1", None, None);
            Ok(())
        })
    });
    assert_eq!(
        text,
        "\nvar address0 = null, index0 = this._offset;\
         \nthis._cache._foo = this._cache._foo || {};\
         \nvar cached0 = this._cache._foo[index0];\
         \nif (cached0 !== undefined) {\
         \n  if (cached0 !== null) {\
         \n    this._offset += cached0.textValue.length;\
         \n  }\
         \n  return cached0;\
         \n}\
         \naddress0 = new SyntaxNode('x', this._offset, []);\
         \nthis._offset += 1;\
         \nreturn this._cache._foo[index0] = address0;"
    );
}

#[test]
fn cache_body_runs_between_lookup_and_store() {
    let text = emit(|b| {
        b.cache(&rule("foo"), |b, _| {
            b.line("BODY");
            Ok(())
        })
    });
    let lookup = text.find("return cached0;").unwrap();
    let body = text.find("BODY;").unwrap();
    let store = text.find("return this._cache._foo[index0] = address0;").unwrap();
    assert!(lookup < body && body < store);
}

#[test]
fn cache_locals_are_fresh_per_rule_method() {
    let text = emit(|b| {
        b.grammar_module(|b| {
            for name in ["a", "b"] {
                let r = rule(name);
                b.method(&reader_name(&r), &[], |b| {
                    b.cache(&r, |b, address| {
                        assert_eq!(address, "address0");
                        b.assign(address, "null");
                        Ok(())
                    })
                })?;
            }
            Ok(())
        })
    });
    assert!(text.contains("return this._cache._a[index0] = address0;"));
    assert!(text.contains("return this._cache._b[index0] = address0;"));
}

#[test]
fn cache_table_and_reader_names() {
    assert_eq!(cache_table(&rule("value")), "this._cache._value");
    assert_eq!(reader_name(&rule("value")), "_read_value");
}

// ══════════════════════════════════════════════════════════════════════════════
// Failures
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn failure_records_only_at_or_beyond_the_current_error() {
    let text = emit(|b| b.failure("address0", "\"a\""));
    assert_eq!(
        text,
        "\naddress0 = null;\
         \nif (!this.error || this.error.offset <= this._offset) {\
         \n  this.error = this.constructor.lastError = \
         {input: this._input, offset: this._offset, expected: '\"a\"'};\
         \n}"
    );
}

#[test]
fn failure_quotes_its_expectation() {
    let text = emit(|b| b.failure("address0", "'\n'"));
    assert!(text.contains(r"expected: '\'\n\''}"));
}

// ══════════════════════════════════════════════════════════════════════════════
// Syntax nodes and input access
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn syntax_node_is_tagged_after_construction() {
    let text = emit(|b| {
        b.syntax_node(
            "address1",
            Some(&tag("Pair")),
            "chunk0",
            "2",
            Some("[address2, address3]"),
            Some("Node1"),
        );
        Ok(())
    });
    assert_eq!(
        text,
        "\naddress1 = new Node1(chunk0, this._offset, [address2, address3]);\
         \naddress1.setRuleTag('Pair');\
         \nthis._offset += 2;"
    );
}

#[test]
fn untagged_syntax_node() {
    let text = emit(|b| {
        b.syntax_node("address0", None, "chunk0", "1", None, None);
        Ok(())
    });
    assert!(!text.contains("setRuleTag"));
    assert!(text.contains("new SyntaxNode(chunk0, this._offset, []);"));
}

#[test]
fn node_types_are_mixed_in_from_the_parser_class() {
    let text = emit(|b| {
        b.syntax_node("address0", None, "chunk0", "1", None, None);
        b.extend_node("address0", "Digit");
        Ok(())
    });
    assert!(text.ends_with("\nthis._offset += 1;\nextend(address0, this.constructor.Digit);"));
}

#[test]
fn syntax_node_class_has_setter_and_iteration() {
    let mut name = "";
    let text = emit(|b| {
        name = b.syntax_node_class()?;
        Ok(())
    });
    assert_eq!(name, "SyntaxNode");
    assert!(text.contains(
        "\nvar SyntaxNode = function(textValue, offset, elements) {\
         \n  this.textValue = textValue;\
         \n  this.offset = offset;\
         \n  this.elements = elements || [];\
         \n  this.ruleTag = null;\
         \n};"
    ));
    assert!(text.contains("\nSyntaxNode.prototype.setRuleTag = function(tag) {\n  this.ruleTag = tag;\n};"));
    assert!(text.contains(
        "\n  for (var el = this.elements, i = 0, n = el.length; i < n; i++) {\
         \n    block.call(context, el[i], i, el);\
         \n  }"
    ));
    assert_balanced(&text);
}

#[test]
fn node_subclass_of_syntax_node() {
    let text = emit(|b| {
        let parent = b.syntax_node_class()?;
        let class = ClassDescriptor::extending("Node1", parent)?;
        b.class(class, |b| b.constructor(&["textValue", "offset", "elements"], |_| Ok(())))
    });
    assert!(text.contains("\n  SyntaxNode.apply(this, arguments);"));
    assert!(text.contains("\ninherit(Node1, SyntaxNode);"));
}

#[test]
fn chunk_reads_safely() {
    let mut names = Vec::new();
    let text = emit(|b| {
        names.push(b.chunk("1")?);
        names.push(b.chunk("3")?);
        Ok(())
    });
    assert_eq!(names, vec!["chunk0", "chunk1"]);
    assert!(text.starts_with(
        "\nvar chunk0 = null;\
         \nif (this._input.length > this._offset) {\
         \n  chunk0 = this._input.substring(this._offset, this._offset + 1);\
         \n}"
    ));
}

#[test]
fn jump_calls_the_rule_reader() {
    let text = emit(|b| {
        b.jump("address0", &rule("value"));
        Ok(())
    });
    assert_eq!(text, "\naddress0 = this._read_value();");
}

// ══════════════════════════════════════════════════════════════════════════════
// Parser class
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn parser_class_checks_full_consumption() {
    let text = emit(|b| b.package("Doc", |b| b.parser_class(&rule("document"))));
    assert!(text.contains(
        "\n  var Parser = function(input) {\
         \n    this._input = input;\
         \n    this._offset = 0;\
         \n    this._cache = {};\
         \n  };"
    ));
    assert!(text.contains("\n    var result = this._read_document();"));
    assert!(text.contains(
        "\n    if (result !== null && this._offset === this._input.length) {\
         \n      return result;\
         \n    }\
         \n    if (!this.error) {\
         \n      this.error = {input: this._input, offset: this._offset, expected: '<EOF>'};\
         \n    }\
         \n    throw new Error(formatError(this.error));"
    ));
    assert!(text.contains(
        "\n  Parser.parse = function(input) {\
         \n    var parser = new Parser(input);\
         \n    return parser.parse();\
         \n  };"
    ));
    assert!(text.contains("\n  extend(Parser.prototype, Grammar);"));
}

#[test]
fn parser_class_outside_package_is_an_error() {
    let mut builder = Builder::new();
    let err = builder.root().parser_class(&rule("document")).unwrap_err();
    assert!(matches!(err, BuildError::MissingGrammarName));
}

// ══════════════════════════════════════════════════════════════════════════════
// Exports
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn dotted_exports_create_missing_namespaces() {
    let text = emit(|b| b.package("A.B.C", |b| b.exports()));
    assert!(text.contains(
        "\n  var exported = {Grammar: Grammar, Parser: Parser, parse: Parser.parse, formatError: formatError};"
    ));
    assert!(text.contains(
        "\n  if (typeof require === 'function' && typeof exports === 'object') {\
         \n    extend(exports, exported);\
         \n    if (typeof A !== 'undefined' && typeof A.B !== 'undefined') {\
         \n      A.B.C = exported;\
         \n    }\
         \n  } else {"
    ));
    assert!(text.contains(
        "\n    namespace = namespace.A = namespace.A || {};\
         \n    namespace = namespace.B = namespace.B || {};\
         \n    namespace.C = exported;\
         \n  }"
    ));
    let create_a = text.find("namespace.A = namespace.A || {}").unwrap();
    let create_b = text.find("namespace.B = namespace.B || {}").unwrap();
    let assign = text.find("namespace.C = exported").unwrap();
    assert!(create_a < create_b && create_b < assign);
}

#[test]
fn plain_exports_assign_on_the_global_object() {
    let text = emit(|b| b.package("Json", |b| b.exports()));
    assert!(text.contains("\n    extend(exports, exported);\n  } else {"));
    assert!(text.contains(
        "\n    var namespace = typeof globalThis === 'object' ? globalThis : Function('return this')();\
         \n    namespace.Json = exported;\
         \n  }"
    ));
    assert!(!text.contains("typeof Json"));
}

#[test]
fn exports_outside_package_is_an_error() {
    let mut builder = Builder::new();
    let err = builder.root().exports().unwrap_err();
    assert!(matches!(err, BuildError::MissingGrammarName));
}

// ══════════════════════════════════════════════════════════════════════════════
// Complete module
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn complete_module_is_balanced() {
    let text = digits_module("Digits");
    assert_balanced(&text);
    assert!(text.starts_with("(function() {"));
    assert!(text.ends_with("})();\n"));
}

#[test]
fn complete_module_is_evenly_indented() {
    let text = digits_module("Acme.Digits");
    for line in text.lines() {
        let indent = line.len() - line.trim_start_matches(' ').len();
        assert_eq!(indent % 2, 0, "odd indentation: {line:?}");
    }
}

#[test]
fn complete_module_contains_every_part_in_order() {
    let text = digits_module("Digits");
    let order = [
        "'use strict';",
        "var extend = ",
        "var formatError = ",
        "var inherit = ",
        "var SyntaxNode = function",
        "var Grammar = {",
        "_read_number: function() {",
        "this._cache._number = this._cache._number || {};",
        "address0.setRuleTag('Number');",
        "var Parser = function(input) {",
        "var result = this._read_number();",
        "extend(Parser.prototype, Grammar);",
        "var exported = ",
        "namespace.Digits = exported;",
        "})();",
    ];
    let mut last = 0;
    for needle in order {
        let at = text[last..]
            .find(needle)
            .unwrap_or_else(|| panic!("{needle:?} missing or out of order"));
        last += at;
    }
}

#[test]
fn deterministic_output_100_iterations() {
    let reference = digits_module("Digits");
    for i in 0..100 {
        assert_eq!(digits_module("Digits"), reference, "iteration {i} differed");
    }
}
