use std::mem::{offset_of, size_of};

use crate::error::ShaderError;

/// Layout of the per-object matrix block. Lives in one dynamic-offset slot per drawable.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObjectUniform {
    pub mvp: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
}

/// Layout of the light block; vec3 members padded to 16 bytes like WGSL lays them out
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightingUniform {
    pub hangar1: [f32; 4],
    pub hangar2: [f32; 4],
    pub world: [f32; 4],
}

pub const OBJECT_BINDING: u32 = 0;
pub const LIGHTING_BINDING: u32 = 1;

pub const OBJECT_UNIFORM_SIZE: u64 = size_of::<ObjectUniform>() as u64;
pub const LIGHTING_UNIFORM_SIZE: u64 = size_of::<LightingUniform>() as u64;

/// Every uniform the scene shader reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniformName {
    Mvp,
    View,
    Model,
    LightPositionHangar1,
    LightPositionHangar2,
    LightPositionWorldspace,
}

impl UniformName {
    pub const ALL: [UniformName; 6] = [
        UniformName::Mvp,
        UniformName::View,
        UniformName::Model,
        UniformName::LightPositionHangar1,
        UniformName::LightPositionHangar2,
        UniformName::LightPositionWorldspace,
    ];

    /// Member name in the WGSL source
    pub fn shader_name(self) -> &'static str {
        match self {
            UniformName::Mvp => "MVP",
            UniformName::View => "V",
            UniformName::Model => "M",
            UniformName::LightPositionHangar1 => "LightPositionHangar1",
            UniformName::LightPositionHangar2 => "LightPositionHangar2",
            UniformName::LightPositionWorldspace => "LightPosition_worldspace",
        }
    }

    fn location(self) -> UniformLocation {
        let (binding, offset) = match self {
            UniformName::Mvp => (OBJECT_BINDING, offset_of!(ObjectUniform, mvp)),
            UniformName::View => (OBJECT_BINDING, offset_of!(ObjectUniform, view)),
            UniformName::Model => (OBJECT_BINDING, offset_of!(ObjectUniform, model)),
            UniformName::LightPositionHangar1 => (LIGHTING_BINDING, offset_of!(LightingUniform, hangar1)),
            UniformName::LightPositionHangar2 => (LIGHTING_BINDING, offset_of!(LightingUniform, hangar2)),
            UniformName::LightPositionWorldspace => (LIGHTING_BINDING, offset_of!(LightingUniform, world)),
        };
        UniformLocation {
            binding,
            offset: offset as u64,
        }
    }
}

/// Where a uniform lives: binding index and byte offset inside its struct
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformLocation {
    pub binding: u32,
    pub offset: u64,
}

/// Uniform locations, resolved once at startup
#[derive(Debug, Clone)]
pub struct UniformTable {
    locations: [UniformLocation; 6],
}

impl UniformTable {
    /// Check that the shader declares every uniform, in the same member order
    /// as the Rust structs the offsets come from, and build the table.
    pub fn resolve(shader_source: &str) -> Result<Self, ShaderError> {
        let mut previous: Option<(UniformName, usize)> = None;
        for name in UniformName::ALL {
            let line = declaration_line(shader_source, name.shader_name())
                .ok_or(ShaderError::MissingUniform(name.shader_name()))?;
            if let Some((earlier, earlier_line)) = previous {
                if earlier.location().binding == name.location().binding && line <= earlier_line {
                    return Err(ShaderError::MemberOrder {
                        earlier: earlier.shader_name(),
                        later: name.shader_name(),
                    });
                }
            }
            previous = Some((name, line));
        }
        Ok(Self {
            locations: UniformName::ALL.map(UniformName::location),
        })
    }

    pub fn location(&self, name: UniformName) -> UniformLocation {
        self.locations[name as usize]
    }
}

/// Index of the first line of `source` that declares `name: <type>`
fn declaration_line(source: &str, name: &str) -> Option<usize> {
    source.lines().position(|line| {
        let code = line.split("//").next().unwrap_or_default().trim();
        code.strip_prefix(name)
            .map(|rest| rest.trim_start().starts_with(':'))
            .unwrap_or(false)
    })
}

/// Round `size` up to the next multiple of `alignment`
pub fn aligned_stride(size: u64, alignment: u64) -> u64 {
    size.div_ceil(alignment) * alignment
}
