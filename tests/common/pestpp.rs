//! The PEST++ side of the file exchange: template filling and instruction
//! reading, enough to drive a forward run the way PEST++ does.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Writes a model input file from a template, each marker replaced by the
/// value of its parameter, right aligned over the marker width.
pub fn fill_template(tpl: &Path, out: &Path, values: &BTreeMap<String, f64>) {
    let text = fs::read_to_string(tpl).unwrap();
    let mut lines = text.lines();
    let header = lines.next().unwrap();
    let delim = header.strip_prefix("ptf ").unwrap().chars().next().unwrap();

    let mut filled = String::new();
    for line in lines {
        let mut rest = line;
        while let Some(start) = rest.find(delim) {
            let len = rest[start + 1..].find(delim).unwrap() + 2;
            let name = rest[start + 1..start + len - 1].trim();
            let value = format!("{:>len$.6E}", values[name]);
            assert!(value.len() <= len, "marker too narrow for {name}");
            filled.push_str(&rest[..start]);
            filled.push_str(&value);
            rest = &rest[start + len..];
        }
        filled.push_str(rest);
        filled.push('\n');
    }
    fs::write(out, filled).unwrap();
}

/// Reads the observations an instruction file points at in a model output file.
pub fn read_with_instructions(ins: &Path, out: &Path) -> BTreeMap<String, f64> {
    let text = fs::read_to_string(ins).unwrap();
    let output = fs::read_to_string(out).unwrap();
    let mut lines = text.lines();
    assert!(lines.next().unwrap().starts_with("pif "));

    let mut cursor = output.lines();
    let mut values = BTreeMap::new();
    for instruction in lines {
        let tokens: Vec<&str> = instruction.split_whitespace().collect();
        assert_eq!(tokens[..2], ["l1", "w"]);
        let obsnme = tokens[2].trim_matches('!');
        let line = cursor.next().unwrap();
        let value = line.split_whitespace().nth(1).unwrap().parse().unwrap();
        values.insert(obsnme.to_string(), value);
    }
    values
}
