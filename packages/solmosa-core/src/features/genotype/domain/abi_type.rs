use crate::features::genotype::infrastructure::errors::GenotypeError;
use std::fmt;
use std::str::FromStr;

/// Parsed ABI parameter type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AbiType {
    Bool,
    /// Unsigned integer of the given bit width
    Uint(u16),
    /// Signed integer of the given bit width
    Int(u16),
    Address,
    String,
    /// `T[]`
    Array(Box<AbiType>),
    /// `T[k]`
    FixedArray(Box<AbiType>, usize),
}

impl AbiType {
    pub fn parse(ty: &str) -> Result<Self, GenotypeError> {
        let ty = ty.trim();

        if let Some(inner) = ty.strip_suffix("[]") {
            return Ok(Self::Array(Box::new(Self::parse(inner)?)));
        }
        if let Some(open) = ty.strip_suffix(']').and_then(|t| t.rfind('[')) {
            let len = ty[open + 1..ty.len() - 1]
                .parse::<usize>()
                .map_err(|_| GenotypeError::unsupported(ty))?;
            return Ok(Self::FixedArray(Box::new(Self::parse(&ty[..open])?), len));
        }

        match ty {
            "bool" => Ok(Self::Bool),
            "address" | "address payable" => Ok(Self::Address),
            "string" => Ok(Self::String),
            _ => {
                if let Some(bits) = ty.strip_prefix("uint") {
                    Ok(Self::Uint(parse_width(bits, ty)?))
                } else if let Some(bits) = ty.strip_prefix("int") {
                    Ok(Self::Int(parse_width(bits, ty)?))
                } else {
                    Err(GenotypeError::unsupported(ty))
                }
            }
        }
    }
}

fn parse_width(bits: &str, ty: &str) -> Result<u16, GenotypeError> {
    if bits.is_empty() {
        return Ok(256);
    }
    match bits.parse::<u16>() {
        Ok(n) if n >= 8 && n <= 256 && n % 8 == 0 => Ok(n),
        _ => Err(GenotypeError::unsupported(ty)),
    }
}

impl FromStr for AbiType {
    type Err = GenotypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for AbiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbiType::Bool => write!(f, "bool"),
            AbiType::Uint(bits) => write!(f, "uint{}", bits),
            AbiType::Int(bits) => write!(f, "int{}", bits),
            AbiType::Address => write!(f, "address"),
            AbiType::String => write!(f, "string"),
            AbiType::Array(inner) => write!(f, "{}[]", inner),
            AbiType::FixedArray(inner, len) => write!(f, "{}[{}]", inner, len),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scalars() {
        assert_eq!(AbiType::parse("bool").unwrap(), AbiType::Bool);
        assert_eq!(AbiType::parse("uint").unwrap(), AbiType::Uint(256));
        assert_eq!(AbiType::parse("uint8").unwrap(), AbiType::Uint(8));
        assert_eq!(AbiType::parse("int128").unwrap(), AbiType::Int(128));
        assert_eq!(AbiType::parse("address").unwrap(), AbiType::Address);
        assert_eq!(AbiType::parse("string").unwrap(), AbiType::String);
    }

    #[test]
    fn test_parse_arrays() {
        assert_eq!(
            AbiType::parse("uint256[]").unwrap(),
            AbiType::Array(Box::new(AbiType::Uint(256)))
        );
        assert_eq!(
            AbiType::parse("address[3][]").unwrap(),
            AbiType::Array(Box::new(AbiType::FixedArray(Box::new(AbiType::Address), 3)))
        );
        assert_eq!(AbiType::parse("bool[2][]").unwrap().to_string(), "bool[2][]");
    }

    #[test]
    fn test_rejects_unsupported() {
        for ty in ["bytes32", "bytes", "uint7", "uint264", "int0", "tuple", "uint256[x]"] {
            assert!(
                matches!(AbiType::parse(ty), Err(GenotypeError::UnsupportedType { .. })),
                "{ty}"
            );
        }
    }
}
