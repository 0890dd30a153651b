//! # Contract Interface
//!
//! ABI-driven encoding of contract calls and decoding of return data.
//!
//! A [`ContractInterface`] is parsed once from a JSON ABI description and
//! then used to turn a function name plus typed [`Token`] arguments into
//! call data. Arguments are checked against the declared parameter types
//! before anything is encoded.
//!
//! # Examples
//!
//! ```
//! use web3_client::application::abi::ContractInterface;
//!
//! let interface = ContractInterface::parse(
//!     r#"[{"type":"function","name":"totalSupply","inputs":[],
//!          "outputs":[{"name":"","type":"uint256"}],"stateMutability":"view"}]"#,
//! ).unwrap();
//!
//! let data = interface.encode_call("totalSupply", &[]).unwrap();
//! assert_eq!(data.to_vec(), vec![0x18, 0x16, 0x0d, 0xdd]);
//! ```

use super::error::{ClientError, ClientResult};
use ethers::abi::{Abi, Function, Token};
use ethers::types::Bytes;
use tracing::debug;

/// Parsed contract ABI.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractInterface {
    abi: Abi,
}

impl ContractInterface {
    /// Parses a JSON ABI description.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidAbiDescription` if the description is not
    /// a valid JSON ABI.
    pub fn parse(description: &str) -> ClientResult<Self> {
        let abi: Abi = serde_json::from_str(description)
            .map_err(|e| ClientError::invalid_abi_description(e.to_string()))?;
        Ok(Self { abi })
    }

    /// Wraps an already parsed ABI.
    #[must_use]
    pub fn from_abi(abi: Abi) -> Self {
        Self { abi }
    }

    /// Returns the underlying ABI.
    #[must_use]
    pub fn abi(&self) -> &Abi {
        &self.abi
    }

    /// Returns the declared function names, sorted.
    #[must_use]
    pub fn function_names(&self) -> Vec<&str> {
        self.abi.functions.keys().map(String::as_str).collect()
    }

    /// Looks up a function by name.
    ///
    /// Overloaded names resolve to the first declaration.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::UnknownFunction` if the name is not declared.
    pub fn function(&self, name: &str) -> ClientResult<&Function> {
        self.abi
            .function(name)
            .map_err(|_| ClientError::unknown_function(name))
    }

    /// Returns the 4-byte selector of a function.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::UnknownFunction` if the name is not declared.
    pub fn selector(&self, name: &str) -> ClientResult<[u8; 4]> {
        Ok(self.function(name)?.short_signature())
    }

    /// Encodes call data for a read-only call.
    ///
    /// An empty argument list yields exactly the function selector; otherwise
    /// the arguments are checked and encoded as in [`Self::encode_input`].
    ///
    /// # Errors
    ///
    /// Returns `ClientError::UnknownFunction` or
    /// `ClientError::ArgumentEncoding`.
    pub fn encode_call(&self, name: &str, args: &[Token]) -> ClientResult<Bytes> {
        if args.is_empty() {
            let selector = self.selector(name)?;
            debug!(function = name, bytes = selector.len(), "encoded bare selector");
            return Ok(Bytes::from(selector.to_vec()));
        }
        self.encode_input(name, args)
    }

    /// Encodes selector plus ABI-encoded arguments.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::UnknownFunction` if the name is not declared, and
    /// `ClientError::ArgumentEncoding` if the argument count or any argument
    /// type differs from the declaration.
    pub fn encode_input(&self, name: &str, args: &[Token]) -> ClientResult<Bytes> {
        let function = self.function(name)?;
        check_arguments(function, args)?;

        let data = function
            .encode_input(args)
            .map_err(|e| ClientError::argument_encoding(name, e.to_string()))?;
        debug!(function = name, bytes = data.len(), "encoded call data");
        Ok(Bytes::from(data))
    }

    /// Decodes return data against the function's declared outputs.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::UnknownFunction` if the name is not declared and
    /// `ClientError::Decoding` if the data does not match the outputs.
    pub fn decode_output(&self, name: &str, data: &[u8]) -> ClientResult<Vec<Token>> {
        self.function(name)?
            .decode_output(data)
            .map_err(|e| ClientError::decoding(format!("{name}: {e}")))
    }
}

fn check_arguments(function: &Function, args: &[Token]) -> ClientResult<()> {
    if args.len() != function.inputs.len() {
        return Err(ClientError::argument_encoding(
            &function.name,
            format!(
                "expected {} arguments, got {}",
                function.inputs.len(),
                args.len()
            ),
        ));
    }

    for (index, (param, token)) in function.inputs.iter().zip(args).enumerate() {
        if !token.type_check(&param.kind) {
            return Err(ClientError::argument_encoding(
                &function.name,
                format!("argument {index} ({}) is not a {}", param.name, param.kind),
            ));
        }
    }
    Ok(())
}
