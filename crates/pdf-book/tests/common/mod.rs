#![allow(dead_code)]

use lopdf::{Dictionary, Document, Object, Stream};
use pdf_book::*;
use std::path::Path;
use std::sync::Mutex;

type Handler = Box<dyn Fn(&ToolCommand) -> CommandOutput + Send + Sync>;

/// Records every command instead of spawning it. The handler decides what
/// each command prints and may write files the real tool would have made.
pub struct FakeRunner {
    calls: Mutex<Vec<String>>,
    handler: Handler,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::with_handler(|_| CommandOutput::ok(""))
    }

    pub fn with_handler(handler: impl Fn(&ToolCommand) -> CommandOutput + Send + Sync + 'static) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            handler: Box::new(handler),
        }
    }

    /// Command lines in the order they were run; pipes as `a | b`
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// First word of every command line
    pub fn programs(&self) -> Vec<String> {
        self.calls()
            .iter()
            .map(|c| c.split_whitespace().next().unwrap_or_default().to_string())
            .collect()
    }
}

impl CommandRunner for FakeRunner {
    async fn execute(&self, command: &ToolCommand) -> Result<CommandOutput> {
        self.calls.lock().unwrap().push(command.to_string());
        Ok((self.handler)(command))
    }

    async fn execute_piped(
        &self,
        producer: &ToolCommand,
        consumer: &ToolCommand,
    ) -> Result<CommandOutput> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{producer} | {consumer}"));
        Ok((self.handler)(consumer))
    }
}

pub fn failed(stderr: &str) -> CommandOutput {
    CommandOutput {
        status: Some(1),
        stdout: String::new(),
        stderr: stderr.to_string(),
    }
}

/// Value of a `key=value` argument
pub fn arg_value(command: &ToolCommand, key: &str) -> Option<String> {
    let prefix = format!("{key}=");
    command
        .arg_strings()
        .into_iter()
        .find_map(|a| a.strip_prefix(&prefix).map(str::to_string))
}

/// Argument following `flag`
pub fn arg_after(command: &ToolCommand, flag: &str) -> Option<String> {
    let args = command.arg_strings();
    let i = args.iter().position(|a| a == flag)?;
    args.get(i + 1).cloned()
}

pub fn create_test_pdf(num_pages: usize, width: f32, height: f32) -> Document {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for _ in 0..num_pages {
        let content_id = doc.add_object(Stream::new(Dictionary::new(), b"q Q".to_vec()));
        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(width),
                    Object::Real(height),
                ]),
            ),
            ("Resources", Object::Dictionary(Dictionary::new())),
            ("Contents", Object::Reference(content_id)),
        ]));
        kids.push(Object::Reference(page_id));
    }

    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(num_pages as i64)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", catalog_id);

    doc
}

pub fn write_test_pdf(path: &Path, num_pages: usize, width: f32, height: f32) {
    let mut doc = create_test_pdf(num_pages, width, height);
    let mut writer = Vec::new();
    doc.save_to(&mut writer).unwrap();
    std::fs::write(path, writer).unwrap();
}

pub fn a5_geometry(options: &PageOptions) -> PageGeometry {
    let size = BookSize::lookup("A5").unwrap().page_size(None).unwrap();
    PageGeometry::new(size, options).unwrap()
}
