use std::fmt;

use serde::{
    de::{self, Deserializer, SeqAccess, Visitor},
    Deserialize, Serialize, Serializer,
};

use crate::{Alphabet, RandomStrategy};

impl Serialize for Alphabet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl Serialize for RandomStrategy {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Alphabet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct AlphabetVisitor;

        impl<'de> Visitor<'de> for AlphabetVisitor {
            type Value = Alphabet;
            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string of distinct symbols or a list of single-character strings")
            }
            fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
                value.parse().map_err(de::Error::custom)
            }
            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut symbols = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(symbol) = seq.next_element::<char>()? {
                    symbols.push(symbol);
                }
                Alphabet::new(symbols).map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_any(AlphabetVisitor)
    }
}

impl<'de> Deserialize<'de> for RandomStrategy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct StrategyVisitor;

        impl<'de> Visitor<'de> for StrategyVisitor {
            type Value = RandomStrategy;
            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a random strategy tag")
            }
            fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
                Ok(RandomStrategy::from_tag(value))
            }
        }

        deserializer.deserialize_str(StrategyVisitor)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Alphabet, Error, IdLayout, Options, ParsedId, RandomStrategy};

    #[test]
    fn test_alphabet() {
        let alphabet: Alphabet = "xyz".parse().unwrap();
        assert_eq!(serde_json::to_string(&alphabet).unwrap(), r#""xyz""#);

        assert_eq!(serde_json::from_str::<Alphabet>(r#""xyz""#).unwrap(), alphabet);
        assert_eq!(serde_json::from_str::<Alphabet>(r#"["x","y","z"]"#).unwrap(), alphabet);

        let error = serde_json::from_str::<Alphabet>(r#""xyx""#).unwrap_err();
        assert!(error.to_string().contains(&Error::DuplicateSymbol('x').to_string()));
        assert!(serde_json::from_str::<Alphabet>(r#"["xy"]"#).is_err());
    }

    #[test]
    fn test_random_strategy() {
        assert_eq!(serde_json::to_string(&RandomStrategy::Nanoid).unwrap(), r#""nanoid""#);
        assert_eq!(
            serde_json::from_str::<RandomStrategy>(r#""secure""#).unwrap(),
            RandomStrategy::Secure
        );
        assert_eq!(
            serde_json::from_str::<RandomStrategy>(r#""unheard-of""#).unwrap(),
            RandomStrategy::Default
        );
    }

    #[test]
    fn test_options() {
        let json = r#"{
            "symbols": "ABC",
            "prefix": "t-",
            "interval": 1000,
            "workerId": 1,
            "layout": "fixed",
            "randomStrategy": "secure",
            "poolSize": 10
        }"#;

        let options: Options = serde_json::from_str(json).unwrap();
        assert_eq!(options.symbols.to_string(), "ABC");
        assert_eq!(options.prefix, "t-");
        assert_eq!(options.interval, 1000);
        assert_eq!(options.worker_id, Some(1));
        assert_eq!(options.datacenter_id, None);
        assert_eq!(options.layout, IdLayout::Fixed);
        assert_eq!(options.random_strategy, RandomStrategy::Secure);
        assert_eq!(options.pool_size, 10);
        assert_eq!(options.salt_length, Options::default().salt_length);

        let back: Options = serde_json::from_str(&serde_json::to_string(&options).unwrap()).unwrap();
        assert_eq!(back, options);
    }

    #[test]
    fn test_parsed_id() {
        let parsed = ParsedId {
            timestamp: Some(1_000),
            worker_id: Some(2),
            datacenter_id: None,
            salt: "abc".to_string(),
        };

        assert_eq!(
            serde_json::to_string(&parsed).unwrap(),
            r#"{"timestamp":1000,"workerId":2,"datacenterId":null,"salt":"abc"}"#
        );
    }
}
