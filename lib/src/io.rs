//! Loading point clouds and writing reconstructed meshes.
//!
//! `Triangle` stores [`crate::VertexId`]s rather than positions, so every
//! writer here takes the originating `samples` slice alongside the
//! triangles to resolve vertex positions at the I/O boundary.

use core::error::Error;
use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::io::BufWriter;
use std::io::Write;
use std::path::PathBuf;

use glam::Vec3;
use log::info;

use crate::{Sample, Triangle};

static ATTRIBUTE_COUNT: [u8; 2] = [0; 2];

fn resolve(samples: &[Sample], t: &Triangle) -> [Vec3; 3] {
    [
        samples[t.v0].pos,
        samples[t.v1].pos,
        samples[t.v2].pos,
    ]
}

/// Write triangles to a binary STL file.
///
/// # Errors
///   When the file cannot be created or written to.
///
/// # Panics
///   When the number of triangles exceeds that allowed by the STL format.
pub fn save_triangles(
    path: &PathBuf,
    samples: &[Sample],
    triangles: &[Triangle],
) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = std::fs::File::create(path)?;
    let mut writer = BufWriter::new(file);

    // Header
    writer.write_all(&[b' '; 80])?;

    let count = u32::try_from(triangles.len())
        .expect("stl file format cannot contain more than 4,294,967,295 triangles");
    writer.write_all(&count.to_le_bytes())?;

    for t in triangles {
        let verts = resolve(samples, t);
        let normal = (verts[0] - verts[1]).cross(verts[0] - verts[2]).normalize();
        let normal_bytes = normal.to_array().map(f32::to_le_bytes).concat();
        writer.write_all(&normal_bytes)?;

        let triangle_bytes = verts
            .map(|v| v.to_array())
            .iter()
            .flatten()
            .map(|f| f.to_le_bytes())
            .collect::<Vec<_>>()
            .concat();
        writer.write_all(&triangle_bytes)?;

        writer.write_all(&ATTRIBUTE_COUNT)?;
    }

    Ok(())
}

/// Write triangles as an STL file in ascii format.
///
/// Use only when debugging.
///
/// # Errors
///   When the file cannot be created or written to.
pub fn save_triangles_ascii(
    path: &PathBuf,
    samples: &[Sample],
    triangles: &[Triangle],
) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "solid {}", path.to_string_lossy())?;

    for t in triangles {
        let verts = resolve(samples, t);
        let normal = (verts[0] - verts[1]).cross(verts[0] - verts[2]).normalize();
        writeln!(
            writer,
            "  facet normal {} {} {}",
            normal.x, normal.y, normal.z
        )?;
        writeln!(writer, "    outer loop")?;
        for v in verts {
            writeln!(writer, "      vertex {} {} {}", v.x, v.y, v.z)?;
        }
        writeln!(writer, "    endloop")?;
        writeln!(writer, "  endfacet")?;
    }
    writeln!(writer, "endsolid")?;

    Ok(())
}

/// Write a point cloud (positions and normals) to a binary PLY file.
///
/// # Errors
///   Problems writing to file.
pub fn save_points_and_normals(
    path: &PathBuf,
    samples: &[Sample],
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = std::fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    writeln!(writer, "ply")?;
    writeln!(writer, "format binary_little_endian 1.0")?;
    writeln!(writer, "element vertex {}", samples.len())?;
    writeln!(writer, "property float x")?;
    writeln!(writer, "property float y")?;
    writeln!(writer, "property float z")?;
    writeln!(writer, "property float nx")?;
    writeln!(writer, "property float ny")?;
    writeln!(writer, "property float nz")?;
    writeln!(writer, "end_header")?;
    let mut buffer: Vec<u8> = Vec::new();
    for s in samples {
        buffer.extend_from_slice(
            &s.pos
                .to_array()
                .iter()
                .flat_map(|f| f.to_le_bytes())
                .collect::<Vec<u8>>(),
        );
        buffer.extend_from_slice(
            &s.normal
                .to_array()
                .iter()
                .flat_map(|f| f.to_le_bytes())
                .collect::<Vec<u8>>(),
        );
    }
    writer.write_all(&buffer)?;

    Ok(())
}

/// Write bare positions (no normals) to a binary PLY file.
///
/// # Errors
///   Problems writing to file.
pub fn save_points(path: &PathBuf, points: &[Vec3]) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = std::fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    writeln!(writer, "ply")?;
    writeln!(writer, "format binary_little_endian 1.0")?;
    writeln!(writer, "element vertex {}", points.len())?;
    writeln!(writer, "property float x")?;
    writeln!(writer, "property float y")?;
    writeln!(writer, "property float z")?;
    writeln!(writer, "end_header")?;
    let mut buffer: Vec<u8> = Vec::new();
    for point in points {
        buffer.extend_from_slice(
            &point
                .to_array()
                .iter()
                .flat_map(|f| f.to_le_bytes())
                .collect::<Vec<u8>>(),
        );
    }
    writer.write_all(&buffer)?;

    Ok(())
}

/// Reads a point cloud from a whitespace-separated `x y z nx ny nz` text
/// file, one sample per line. Lines with fewer than six fields are
/// skipped.
///
/// # Errors
///   If the file cannot be opened or read.
///
/// # Panics
///   If a present field cannot be parsed as a float.
pub fn load_xyz(path: &PathBuf) -> std::io::Result<Vec<Sample>> {
    let file = std::fs::File::open(path)?;
    let reader = std::io::BufReader::new(file);
    let mut samples = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 6 {
            continue;
        }
        let x: f32 = parts[0].parse().expect("failed to parse x");
        let y: f32 = parts[1].parse().expect("failed to parse y");
        let z: f32 = parts[2].parse().expect("failed to parse z");
        let nx: f32 = parts[3].parse().expect("failed to parse normal x");
        let ny: f32 = parts[4].parse().expect("failed to parse normal y");
        let nz: f32 = parts[5].parse().expect("failed to parse normal z");
        samples.push(Sample {
            pos: Vec3::new(x, y, z),
            normal: Vec3::new(nx, ny, nz),
        });
    }
    Ok(samples)
}

/// Reads a point cloud from a PLY file, picking out the `x y z nx ny nz`
/// columns and ignoring any others (e.g. color).
///
/// # Errors
///   If the file cannot be opened, or the header cannot be decoded.
///
/// # Panics
///   If a data line does not have the number of columns the header
///   declared, or a declared numeric field cannot be parsed.
pub fn load_ply(path: &PathBuf) -> std::io::Result<Vec<Sample>> {
    let file = std::fs::File::open(path)?;
    let mut reader = std::io::BufReader::new(file);

    let header = parse_ply_header(&mut reader)
        .map_err(|_| std::io::Error::other("did not decode header correctly"))?;

    info!("load_ply: {} vertices declared", header.vertex_count);
    let col_count = header.ordered_properties.len();

    let mut samples = Vec::new();

    for next in reader.lines() {
        let line = next.map_err(|_| std::io::Error::other("no more lines"))?;
        let parts: Vec<&str> = line.split_whitespace().collect();

        assert!(
            parts.len() == col_count,
            "did not parse the expected number of columns"
        );

        let mut nx = 0_f32;
        let mut ny = 0_f32;
        let mut nz = 0_f32;
        let mut x = 0_f32;
        let mut y = 0_f32;
        let mut z = 0_f32;
        for (i, (label, _value_type)) in header.ordered_properties.iter().enumerate() {
            match label.as_str() {
                "x" => x = parts[i].parse().expect("failed to parse x"),
                "y" => y = parts[i].parse().expect("failed to parse y"),
                "z" => z = parts[i].parse().expect("failed to parse z"),
                "nx" => nx = parts[i].parse().expect("failed to parse nx"),
                "ny" => ny = parts[i].parse().expect("failed to parse ny"),
                "nz" => nz = parts[i].parse().expect("failed to parse nz"),
                // drop comment columns such as r,g,b
                _ => {}
            }
        }
        samples.push(Sample {
            pos: Vec3::new(x, y, z),
            normal: Vec3::new(nx, ny, nz),
        });
    }
    info!("load_ply: extracted {} samples", samples.len());
    Ok(samples)
}

// The file type of the PLY file.
#[derive(Debug)]
enum Format {
    Ascii(f32),
    BinaryLittleEndian(f32),
    BinaryBigEndian(f32),
}

/// Possible types of properties in a PLY file.
///
/// "The type can be specified with one of
///   char uchar short ushort int uint float double,
/// or one of
///   int8 uint8 int16 uint16 int32 uint32 float32 float64"
///
/// As described here <https://en.wikipedia.org/wiki/PLY_(file_format)>
#[derive(Debug)]
enum Type {
    INT8,
    Char,
    Uint8,
    Uchar,
    Int16,
    Short,
    Uint16,
    Int,
    Int32,
    Ushort,
    Uint,
    Uint32,
    Float,
    Float32,
    Double,
    Float64,
}

#[derive(Debug)]
struct UnknownType;

impl std::fmt::Display for UnknownType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unknown type")
    }
}

impl Error for UnknownType {}

///   char uchar short ushort int uint float double,
/// or one of
///   int8 uint8 int16 uint16 int32 uint32 float32 float64"
///
impl TryFrom<&str> for Type {
    type Error = UnknownType;
    fn try_from(input: &str) -> Result<Self, Self::Error> {
        match input {
            "char" => Ok(Self::Char),
            "int8" => Ok(Self::INT8),

            "uchar" => Ok(Self::Uchar),
            "uint8" => Ok(Self::Uint8),

            "short" => Ok(Self::Short),
            "int16" => Ok(Self::Int16),

            "ushort" => Ok(Self::Ushort),
            "uint16" => Ok(Self::Uint16),

            "int" => Ok(Self::Int),
            "int32" => Ok(Self::Int32),

            "uint" => Ok(Self::Uint),
            "uint32" => Ok(Self::Uint32),

            "float" => Ok(Self::Float),
            "float32" => Ok(Self::Float32),

            "double" => Ok(Self::Double),
            "float64" => Ok(Self::Float64),

            _ => Err(UnknownType),
        }
    }
}
/// The header of a PLY file
#[derive(Debug)]
struct Header {
    /// The format of the PLY file.
    pub format: Format,
    /// The number of vertices in the PLY file.
    pub vertex_count: u64,
    /// The columns of the data section (label, type)
    pub ordered_properties: Vec<(String, Type)>,
}

enum HeaderError {
    InvalidFile,
    Malformed,
}

// Extract data from a PLY header
//header format
// ply
// format ascii 1.0
// comment This is a comment!
// element vertex 779966
// property float x
// property float y
// property float z
// end_header
//
// The second line is one of
// format ascii 1.0
// format binary_little_endian 1.0
// format binary_big_endian 1.0
//
fn parse_ply_header(buffer: &mut BufReader<File>) -> Result<Header, HeaderError> {
    info!("reading ply header");
    let mut line = String::new();
    buffer
        .read_line(&mut line)
        .map_err(|_| HeaderError::InvalidFile)?;

    if !line.starts_with("ply") {
        return Err(HeaderError::InvalidFile);
    }

    let mut format: Option<Format> = None;
    let mut ordered_properties = vec![];

    let mut vertex_count: u64 = 0;

    for line in buffer.lines() {
        let line = line.map_err(|_| HeaderError::Malformed)?;
        let line = line.trim();

        if line == "end_header" {
            return match format {
                Some(format) => Ok(Header {
                    format,
                    vertex_count,
                    ordered_properties,
                }),
                None => Err(HeaderError::Malformed),
            };
        }

        if line.starts_with("comment") {
            continue;
        }

        if line.starts_with("element face") {
            continue;
        }

        if line.starts_with("element vertex") {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() != 3 {
                return Err(HeaderError::Malformed);
            }
            vertex_count = parts[2].parse::<u64>().map_err(|_| HeaderError::Malformed)?;
            continue;
        }

        if line == "format ascii 1.0" {
            format = Some(Format::Ascii(1.0));
        }
        if line == "format binary_little_endian 1.0" {
            format = Some(Format::BinaryLittleEndian(1.0));
        }
        if line == "format binary_big_endian 1.0" {
            format = Some(Format::BinaryBigEndian(1.0));
        }
        if line.starts_with("property") {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() != 3 {
                return Err(HeaderError::Malformed);
            }
            let prop_type = Type::try_from(parts[1]).map_err(|_| HeaderError::Malformed)?;
            let label = parts[2].to_string();
            ordered_properties.push((label, prop_type));
            continue;
        }
    }

    Err(HeaderError::Malformed)
}
