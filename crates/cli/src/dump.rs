use clap::{Args, ValueEnum};
use locus_api::{ByteOrder, Handle};
use locus_core::LocationService;
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ValueType {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    F32,
    F64,
}

#[derive(Args)]
pub struct DumpArgs {
    #[arg(value_name = "ID")]
    pub id: String,
    /// Value type to decode
    #[arg(long = "type", value_enum, default_value = "u8")]
    pub value_type: ValueType,
    /// Byte order: big or little
    #[arg(long, default_value = "big")]
    pub order: ByteOrder,
    /// Byte offset to start reading from
    #[arg(long, default_value_t = 0)]
    pub offset: u64,
    /// Number of values to read
    #[arg(long, default_value_t = 16)]
    pub count: usize,
}

fn read_value(handle: &Handle, value_type: ValueType) -> io::Result<String> {
    Ok(match value_type {
        ValueType::U8 => handle.read_u8()?.to_string(),
        ValueType::I8 => handle.read_i8()?.to_string(),
        ValueType::U16 => handle.read_u16()?.to_string(),
        ValueType::I16 => handle.read_i16()?.to_string(),
        ValueType::U32 => handle.read_u32()?.to_string(),
        ValueType::I32 => handle.read_i32()?.to_string(),
        ValueType::U64 => handle.read_u64()?.to_string(),
        ValueType::I64 => handle.read_i64()?.to_string(),
        ValueType::F32 => handle.read_f32()?.to_string(),
        ValueType::F64 => handle.read_f64()?.to_string(),
    })
}

pub fn run(service: &LocationService, args: &DumpArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mapped = service.mapped_handle(&args.id).is_some();
    let handle = service.resolve(&args.id)?;
    handle.set_order(args.order);
    handle.seek(args.offset)?;

    let mut offset = args.offset;
    for _ in 0..args.count {
        match read_value(&handle, args.value_type) {
            Ok(value) => {
                println!("{offset:>10}  {value}");
                offset = handle.position()?;
            }
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(e.into()),
        }
    }

    if !mapped {
        handle.close()?;
    }
    Ok(())
}
