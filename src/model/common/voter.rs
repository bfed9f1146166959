use std::fmt::{Display, Formatter};
use std::str::FromStr;

use rocket::{
    http::{
        impl_from_uri_param_identity,
        uri::fmt::{Path, UriDisplay},
    },
    request::FromParam,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The identity of a voter, as handed to us by the identity layer.
/// It is opaque: we never look inside it, only compare it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VoterAddress(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("voter address must not be empty")]
pub struct EmptyAddress;

impl VoterAddress {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for VoterAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for VoterAddress {
    type Err = EmptyAddress;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.to_string().try_into()
    }
}

impl TryFrom<String> for VoterAddress {
    type Error = EmptyAddress;

    fn try_from(address: String) -> Result<Self, Self::Error> {
        if address.trim().is_empty() {
            Err(EmptyAddress)
        } else {
            Ok(Self(address))
        }
    }
}

impl From<VoterAddress> for String {
    fn from(address: VoterAddress) -> Self {
        address.0
    }
}

impl<'a> FromParam<'a> for VoterAddress {
    type Error = EmptyAddress;

    fn from_param(param: &'a str) -> Result<Self, Self::Error> {
        param.parse()
    }
}

impl UriDisplay<Path> for VoterAddress {
    fn fmt(&self, formatter: &mut rocket::http::uri::fmt::Formatter<'_, Path>) -> std::fmt::Result {
        formatter.write_value(&self.0)
    }
}

impl_from_uri_param_identity!([Path] VoterAddress);


#[cfg(test)]
mod tests {
    use super::*;

    use rocket::serde::json::serde_json;

    #[test]
    fn rejects_blank_addresses() {
        assert_eq!("".parse::<VoterAddress>(), Err(EmptyAddress));
        assert_eq!("   ".parse::<VoterAddress>(), Err(EmptyAddress));
        assert!(serde_json::from_str::<VoterAddress>("\"\"").is_err());
    }

    #[test]
    fn serializes_as_plain_string() {
        let address = VoterAddress::example1();
        let json = serde_json::to_string(&address).unwrap();
        assert_eq!(json, format!("\"{}\"", address));
        assert_eq!(serde_json::from_str::<VoterAddress>(&json).unwrap(), address);
    }
}
