use std::fs;
use std::path::Path;
use v8_insights::insights::last_compiled_code;
use v8_insights::session::code_context;
use v8_insights::utils::config::Config;
use v8_insights::utils::error::TraceError;
use v8_insights::InsightSession;

const EVENT_LOG: &str = "\
code-creation,Script,11,100,0x1000,50, file:///app/main.js:1:1,0x0,~
code-creation,LazyCompile,11,110,0x1100,50,sum file:///app/main.js:4:10,0x0,~
code-creation,LazyCompile,0,1610,0x2a8a00084040,60,sum file:///app/main.js:4:10,0x0,*
";

fn code_line(address: &str, offset: &str, bytes: &str, instruction: &str) -> String {
    format!("{:<19}{:<4}{:<21}{}", address, offset, bytes, instruction)
}

fn opt_code() -> String {
    let lines = [
        "--- Raw source ---".to_string(),
        "0x2a8a00084040 <Code TURBOFAN>".to_string(),
        code_line("0x2a8a00084040", "0", "55", "push rbp"),
        code_line("0x2a8a00084041", "1", "4889e5", "REX.W movq rbp,rsp"),
        code_line("0x2a8a00084044", "4", "4803c1", "REX.W addq rax,rcx"),
        code_line("0x2a8a00084047", "7", "483bd9", "REX.W cmpq rbx,rcx"),
        code_line("0x2a8a0008404a", "a", "75f8", "jnz 0x2a8a00084044  <+0x4>"),
        code_line("0x2a8a0008404c", "c", "e9aabbccdd", "jmp 0x2a8a00099999"),
        code_line("0x2a8a00084051", "11", "c3", "ret"),
        String::new(),
        "0x2a8a00090000 <Code TURBOFAN>".to_string(),
        code_line("0x2a8a00090000", "0", "90", "nop"),
        String::new(),
    ];
    lines.join("\n") + "\n"
}

fn write_logs(dir: &Path) {
    fs::write(dir.join("log"), EVENT_LOG).unwrap();
    fs::write(dir.join("opt-code"), opt_code()).unwrap();
}

#[test]
fn test_code_line_layout() {
    let line = code_line("0x2a8a00084047", "7", "483bd9", "REX.W cmpq rbx,rcx");
    assert!(line.len() > 30);
    assert_eq!(
        v8_insights::disasm::split_line(&line).instruction,
        "cmpq rbx,rcx"
    );
}

#[test]
fn test_analyze_and_decompile_from_files() {
    let dir = tempfile::tempdir().unwrap();
    write_logs(dir.path());

    let mut session = InsightSession::new(Config::default().with_insights_dir(dir.path()));
    session.analyze().unwrap();

    let file = session.get_insights("/app/main.js").unwrap();
    let sum = file.function_at_line(3).unwrap();
    assert_eq!(sum.name, "sum");
    assert_eq!(sum.compile_time, Some(1500));

    let address = last_compiled_code(sum).unwrap().start.clone();
    assert_eq!(address, "0x2a8a00084040");

    let raw = session.get_optimized_code(&address).unwrap();
    assert_eq!(raw.len(), 8);
    assert_eq!(raw.last().map(String::as_str), Some(""));

    let code = session.decompile_address(&address).unwrap();
    assert_eq!(
        code,
        [
            "  push rbp",
            "  movq rbp,rsp",
            "loop0:",
            "  addq rax,rcx",
            "  cmpq rbx,rcx",
            "  jnz loop0",
            "  jmp 0x2a8a00099999 (outside)",
            "  ret",
        ]
        .join("\n")
    );

    let context = code_context(&address);
    let label = session.labels().label_at_line(&context, 5).unwrap();
    assert_eq!(label.display_name(), "loop0");
}

#[test]
fn test_unknown_code_address_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    write_logs(dir.path());

    let session = InsightSession::new(Config::default().with_insights_dir(dir.path()));
    assert!(session.get_optimized_code("0x1234").unwrap().is_empty());
}

#[test]
fn test_missing_event_log_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = InsightSession::new(Config::default().with_insights_dir(dir.path()));

    let err = session.analyze().unwrap_err();
    assert!(matches!(err, TraceError::MissingLog(_)));
    assert!(err.to_string().contains("log"));
}

#[test]
fn test_config_file_names_are_used() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("events.txt"), EVENT_LOG).unwrap();

    let config = Config {
        insights_dir: dir.path().to_path_buf(),
        event_log: "events.txt".to_string(),
        ..Config::default()
    };
    let mut session = InsightSession::new(config);
    let stats = session.analyze().unwrap();
    assert_eq!(stats.records, 3);
}
