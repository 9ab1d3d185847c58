//! Integration tests for classification and tool resolution

use datatype_query_api::descriptor_file::{ID_DTHD, ID_DTTL, ID_DTYP};
use datatype_query_api::{
    DatatypeDescriptor, DatatypeRegistry, DescriptorLocator, DescriptorRegistry, GroupId,
    ResolveStage, ToolBinding, ToolFlags, ToolMode, ToolResolver,
};
use datatype_query_iff::FormBuilder;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const ILBM_FILE: &[u8] = b"FORM\0\0\0\x20ILBMBMHD\0\0\0\x14\
    \0\x40\0\x40\0\0\0\0\x08\0\0\0\0\0\x01\x01\x01\x01";

fn tool_record(mode: ToolMode, flags: u16, program: &str) -> Vec<u8> {
    let mut record = Vec::new();
    record.extend_from_slice(&mode.code().to_be_bytes());
    record.extend_from_slice(&flags.to_be_bytes());
    record.extend_from_slice(&8u32.to_be_bytes());
    record.extend_from_slice(program.as_bytes());
    record.push(0);
    record
}

/// `DTHD` payload for an IFF picture type recognised by its `FORM....ILBM` prefix.
fn ilbm_header() -> Vec<u8> {
    let mut strings = Vec::new();
    strings.extend_from_slice(b"ILBM\0ilbm\0");
    let mask_offset = 32 + strings.len() as u32;
    for byte in *b"FORM" {
        strings.extend_from_slice(&u16::from(byte).to_be_bytes());
    }
    for _ in 0..4 {
        strings.extend_from_slice(&0x8000u16.to_be_bytes());
    }
    for byte in *b"ILBM" {
        strings.extend_from_slice(&u16::from(byte).to_be_bytes());
    }

    let mut header = Vec::new();
    header.extend_from_slice(&32u32.to_be_bytes()); // name
    header.extend_from_slice(&37u32.to_be_bytes()); // base name
    header.extend_from_slice(&0u32.to_be_bytes()); // pattern
    header.extend_from_slice(&mask_offset.to_be_bytes());
    header.extend_from_slice(b"pict");
    header.extend_from_slice(b"ILBM");
    header.extend_from_slice(&12i16.to_be_bytes());
    header.extend_from_slice(&0u16.to_be_bytes());
    header.extend_from_slice(&0x0002u16.to_be_bytes()); // IFF kind
    header.extend_from_slice(&0u16.to_be_bytes());
    header.extend_from_slice(&strings);
    header
}

fn write_descriptor(dir: &Path, name: &str, tools: &[Vec<u8>]) -> PathBuf {
    let mut builder = FormBuilder::new(ID_DTYP).chunk(ID_DTHD, ilbm_header());
    for tool in tools {
        builder.push_chunk(ID_DTTL, tool.clone());
    }
    let path = dir.join(name);
    std::fs::write(&path, builder.build()).unwrap();
    path
}

fn picture(tools: Vec<ToolBinding>) -> DatatypeDescriptor {
    DatatypeDescriptor::new(GroupId::Picture, "picture", "Picture").with_tools(tools)
}

fn print_tool() -> ToolBinding {
    ToolBinding::new(ToolMode::Print, ToolFlags::from_bits(1), "Printer")
}

#[test]
fn locator_prefers_descriptor_over_icon() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("picture.info"), b"icon").unwrap();
    std::fs::write(dir.path().join("PICTURE.ILBM"), b"descriptor").unwrap();

    let found = DescriptorLocator::new(dir.path()).locate("picture").unwrap();
    assert_eq!(found.file_name().unwrap(), "PICTURE.ILBM");
}

#[test]
fn descriptor_file_supplies_missing_exact_mode() {
    let dir = TempDir::new().unwrap();
    write_descriptor(
        dir.path(),
        "picture",
        &[tool_record(ToolMode::Edit, 1, "SYS:Tools/Paint")],
    );
    let resolver = ToolResolver::new(DescriptorLocator::new(dir.path()));

    let resolution = resolver
        .resolve_with_stage(&picture(vec![print_tool()]), ToolMode::Edit)
        .unwrap();
    assert_eq!(resolution.stage, ResolveStage::DescriptorFile);
    assert_eq!(resolution.binding.mode, ToolMode::Edit);
    assert_eq!(resolution.binding.program.as_deref(), Some(&b"SYS:Tools/Paint"[..]));
}

#[test]
fn any_available_tool_without_descriptor_file() {
    let dir = TempDir::new().unwrap();
    let resolver = ToolResolver::new(DescriptorLocator::new(dir.path()));

    let binding = resolver
        .resolve(&picture(vec![print_tool()]), ToolMode::Edit)
        .unwrap();
    assert_eq!(binding, print_tool());
}

#[test]
fn header_only_descriptor_file_falls_through() {
    let dir = TempDir::new().unwrap();
    write_descriptor(dir.path(), "picture", &[]);
    let resolver = ToolResolver::new(DescriptorLocator::new(dir.path()));

    let resolution = resolver
        .resolve_with_stage(&picture(vec![print_tool()]), ToolMode::Edit)
        .unwrap();
    assert_eq!(resolution.stage, ResolveStage::AnyAvailable);
    assert_eq!(resolution.binding, print_tool());
}

#[test]
fn classified_file_resolves_through_stale_registry() {
    let descriptors = TempDir::new().unwrap();
    let files = TempDir::new().unwrap();
    write_descriptor(
        descriptors.path(),
        "ilbm",
        &[tool_record(ToolMode::Browse, 2, "MultiView")],
    );
    let registry = DescriptorRegistry::load(descriptors.path()).unwrap();

    let target = files.path().join("picture");
    std::fs::write(&target, ILBM_FILE).unwrap();
    let descriptor = registry.obtain(&target).unwrap();
    assert_eq!(descriptor.base_name, "ilbm");
    assert_eq!(descriptor.group, GroupId::Picture);

    // The descriptor file gains an editor after the registry was loaded.
    write_descriptor(
        descriptors.path(),
        "ilbm",
        &[
            tool_record(ToolMode::Browse, 2, "MultiView"),
            tool_record(ToolMode::Edit, 2, "Paint"),
        ],
    );

    let resolver = ToolResolver::new(DescriptorLocator::new(descriptors.path()));
    let browse = resolver
        .resolve_with_stage(&descriptor, ToolMode::Browse)
        .unwrap();
    assert_eq!(browse.stage, ResolveStage::Registry);

    let edit = resolver.resolve_with_stage(&descriptor, ToolMode::Edit).unwrap();
    assert_eq!(edit.stage, ResolveStage::DescriptorFile);
    assert_eq!(edit.binding.program.as_deref(), Some(&b"Paint"[..]));

    let mail = resolver.resolve_with_stage(&descriptor, ToolMode::Mail).unwrap();
    assert_eq!(mail.stage, ResolveStage::AnyAvailable);
    assert_eq!(mail.binding.program.as_deref(), Some(&b"MultiView"[..]));
}

#[test]
fn unclaimed_text_file_gets_builtin_fallback() {
    let descriptors = TempDir::new().unwrap();
    let files = TempDir::new().unwrap();
    let registry = DescriptorRegistry::load(descriptors.path()).unwrap();

    let target = files.path().join("notes.txt");
    std::fs::write(&target, b"Shopping list\n- milk\n").unwrap();
    let descriptor = registry.obtain(&target).unwrap();
    assert_eq!(descriptor.base_name, "ascii");

    let resolver = ToolResolver::new(DescriptorLocator::new(descriptors.path()));
    assert_eq!(resolver.resolve(&descriptor, ToolMode::Browse), None);
}
