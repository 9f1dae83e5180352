use crate::{KeyPrefix, NodeRef, RadixTrie};

use super::{Visitable, Visitor};
use std::{
    fmt::Debug,
    io::{self, Write},
};

/// A visitor of the radix trie that will print the tree in "dot" notation.
///
/// See ['DOT Language | Graphviz'](https://graphviz.org/doc/info/lang.html) for
/// information about syntax and example of the language.
pub struct DotPrinter<O: Write> {
    output: O,
}

impl<O: Write> DotPrinter<O> {
    /// Write the dot-format of the given trie to the given output.
    pub fn print_tree<V: Debug>(output: O, trie: &RadixTrie<V>) -> io::Result<()> {
        let mut visitor = DotPrinter { output };

        visitor.output_prelude()?;
        trie.root().visit_with(&mut visitor)?;
        visitor.output_epilogue()
    }

    fn output_prelude(&mut self) -> io::Result<()> {
        writeln!(self.output, "strict digraph G {{")?;
        writeln!(self.output, "node [shape=record]")
    }

    fn output_epilogue(&mut self) -> io::Result<()> {
        writeln!(self.output, "}}")
    }

    fn write_header<V: Debug>(&mut self, t: NodeRef<'_, V>) -> io::Result<()> {
        let label = match t.key_on_parent() {
            Some(label) => format!("{:?}", KeyPrefix::from(label)),
            None => String::from("root"),
        };
        let value = match t.value() {
            Some(value) => format!("{value:?}"),
            None => String::from("-"),
        };

        write!(self.output, "{} ", t.id())?;
        write!(self.output, "[label=\"{{")?;
        write!(
            self.output,
            "{{<h0> {} | {} | {}}}",
            t.id(),
            escape_record(&label),
            escape_record(&value)
        )
    }
}

/// Escape the characters that have a meaning inside of a record label.
fn escape_record(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '"' | '\\' | '{' | '}' | '|' | '<' | '>') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

impl<V: Debug, O: Write> Visitor<V> for DotPrinter<O> {
    type Output = io::Result<()>;

    fn default_output(&self) -> Self::Output {
        Ok(())
    }

    fn combine_output(&self, o1: Self::Output, o2: Self::Output) -> Self::Output {
        o1.and(o2)
    }

    fn enter_inner(&mut self, t: NodeRef<'_, V>) -> Self::Output {
        self.write_header(t)?;
        // write child line
        write!(self.output, " | {{")?;
        for (idx, (label, _)) in t.children().enumerate() {
            let label = escape_record(&format!("{:?}", KeyPrefix::from(label)));
            if idx == 0 {
                write!(self.output, "<c{idx}> {label}")?;
            } else {
                write!(self.output, " | <c{idx}> {label}")?;
            }
        }
        writeln!(self.output, "}}}}\"]")?;

        // write all the edges, the children follow later in the traversal
        for (idx, (_, child)) in t.children().enumerate() {
            writeln!(self.output, "{}:c{idx} -> {}:h0", t.id(), child.id())?;
        }

        Ok(())
    }

    fn visit_leaf(&mut self, t: NodeRef<'_, V>) -> Self::Output {
        self.write_header(t)?;
        writeln!(self.output, "}}\"]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_tree_output_to_dot() {
        let mut trie = RadixTrie::new();
        for (key, value) in [("AA-AA", 1), ("AA-AB", 2), ("BB", 3)] {
            trie.insert(key, value).unwrap();
        }

        let mut buffer = Vec::new();
        DotPrinter::print_tree(&mut buffer, &trie).unwrap();
        let output = String::from_utf8(buffer).unwrap();

        assert_eq!(
            output,
            r#"strict digraph G {
node [shape=record]
n0 [label="{{<h0> n0 | root | -} | {<c0> \"AA-A\" | <c1> \"BB\"}}"]
n0:c0 -> n2:h0
n0:c1 -> n4:h0
n2 [label="{{<h0> n2 | \"AA-A\" | -} | {<c0> \"A\" | <c1> \"B\"}}"]
n2:c0 -> n1:h0
n2:c1 -> n3:h0
n1 [label="{{<h0> n1 | \"A\" | 1}}"]
n3 [label="{{<h0> n3 | \"B\" | 2}}"]
n4 [label="{{<h0> n4 | \"BB\" | 3}}"]
}
"#
        );
    }

    #[test]
    fn empty_tree_output_to_dot() {
        let trie = RadixTrie::<u8>::new();

        let mut buffer = Vec::new();
        DotPrinter::print_tree(&mut buffer, &trie).unwrap();
        let output = String::from_utf8(buffer).unwrap();

        assert_eq!(
            output,
            "strict digraph G {\nnode [shape=record]\nn0 [label=\"{{<h0> n0 | root | -}}\"]\n}\n"
        );
    }

    #[test]
    fn deep_tree_output_to_dot() {
        let mut trie = RadixTrie::new();
        for len in 1..=8_000 {
            trie.insert(&vec![b'x'; len], len).unwrap();
        }

        let mut buffer = Vec::new();
        DotPrinter::print_tree(&mut buffer, &trie).unwrap();
        let output = String::from_utf8(buffer).unwrap();

        // one record per node and one line per edge
        assert_eq!(output.matches("[label=").count(), 8_001);
        assert_eq!(output.matches(" -> ").count(), 8_000);
        assert!(output.ends_with("n8000 [label=\"{{<h0> n8000 | \\\"x\\\" | 8000}}\"]\n}\n"));
    }
}
