//! Runtime helpers inlined at the top of every generated module.
//!
//! These are fixed JavaScript fragments shipped with the generator. They are
//! written at depth 0 and re-indented to wherever `package` places them.

use crate::scope::Scope;

/// `extend(target, source)`: copy `source`'s own properties onto `target`.
pub const EXTEND: &str = "\
function(target, source) {
  if (!source) return target;
  for (var key in source) {
    if (Object.prototype.hasOwnProperty.call(source, key)) {
      target[key] = source[key];
    }
  }
  return target;
}";

/// `formatError(error)`: render `{input, offset, expected}` as
/// `Line <n>: expected <expected>`, the offending line, and a caret under
/// the failure column.
pub const FORMAT_ERROR: &str = "\
function(error) {
  var lines = error.input.split(/\\n/g),
      lineNo = 0,
      offset = 0;

  while (offset <= error.offset && lineNo < lines.length) {
    offset += lines[lineNo].length + 1;
    lineNo += 1;
  }
  var line = lines[lineNo - 1],
      message = 'Line ' + lineNo + ': expected ' + error.expected + '\\n' + line + '\\n';

  offset -= line.length + 1;
  while (offset < error.offset) {
    message += ' ';
    offset += 1;
  }
  return message + '^';
}";

/// `inherit(subclass, parent)`: point `subclass`'s prototype chain at
/// `parent.prototype` without running the parent constructor.
pub const INHERIT: &str = "\
function(subclass, parent) {
  var chain = function() {};
  chain.prototype = parent.prototype;
  subclass.prototype = new chain();
  subclass.prototype.constructor = subclass;
}";

/// Helper name → fragment, in emission order.
pub const HELPERS: [(&str, &str); 3] = [
    ("extend", EXTEND),
    ("formatError", FORMAT_ERROR),
    ("inherit", INHERIT),
];

impl Scope<'_> {
    /// Declare every runtime helper as a local of the current scope, each
    /// followed by a blank line.
    pub(crate) fn runtime_helpers(&mut self) {
        for (name, fragment) in HELPERS {
            self.newline();
            self.write(&format!("var {name} = "));
            self.write_fragment(fragment);
            self.write(";");
            self.newline();
        }
    }
}
