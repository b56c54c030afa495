//! The request parameter store.
//!
//! [`RequestParams`] normalizes URL-encoded parameters, multipart fields and
//! uploaded files of one request into a single store, then serves typed,
//! validated reads over it.

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::de::{value::StrDeserializer, DeserializeOwned, IntoDeserializer};
use tracing::debug;

use crate::multipart::Multipart;
use crate::{indexed, DateFormat, InboundRequest, ParamError, ParamsConfig, UploadStorage, UploadedFile};

/// Parameters and uploaded files of one request.
///
/// Built once by [`parse`](Self::parse) and read-only afterwards, except for
/// [`dispose`](Self::dispose) which the request's owner must call once the
/// response has been produced.
///
/// # Example
///
/// ```rust
/// use hermes_params::{InboundRequest, ParamsConfig, RequestParams};
/// use http::Uri;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let request = InboundRequest::builder()
///     .uri(Uri::from_static("/users?limit=10&active=TRUE&tags[1]=b&tags[0]=a"))
///     .build();
///
/// let params = RequestParams::parse(&request, &ParamsConfig::default()).await.unwrap();
///
/// assert_eq!(params.get_as_int("limit", 1, 100, true).unwrap(), Some(10));
/// assert!(params.get_as_boolean("active", false).unwrap());
/// assert_eq!(params.get_as_list_of_strings("tags"), ["a", "b"]);
/// # }
/// ```
#[derive(Debug)]
pub struct RequestParams {
    parameters: IndexMap<String, String>,
    files: IndexMap<String, UploadedFile>,
    date_format: DateFormat,
}

impl RequestParams {
    /// Parses `request` using the upload directory from `config`.
    ///
    /// # Errors
    ///
    /// Returns a decoding or payload error if the multipart body cannot be
    /// decomposed. No partial store is returned and any files already
    /// stored for the request are released.
    pub async fn parse(request: &InboundRequest, config: &ParamsConfig) -> Result<Self, ParamError> {
        let storage = config.upload_storage();
        Self::parse_with_storage(request, config, &storage).await
    }

    /// Parses `request`, asking `storage` for the upload directory.
    ///
    /// `storage` is only consulted for multipart requests, once, before the
    /// body is decomposed.
    ///
    /// # Errors
    ///
    /// See [`parse`](Self::parse).
    pub async fn parse_with_storage(
        request: &InboundRequest,
        config: &ParamsConfig,
        storage: &dyn UploadStorage,
    ) -> Result<Self, ParamError> {
        let mut params = Self {
            parameters: IndexMap::new(),
            files: IndexMap::new(),
            date_format: config.date_format.clone(),
        };

        let multipart = request.is_multipart();
        if multipart {
            if let Err(e) = params.process_multipart(request, config, storage).await {
                params.dispose();
                return Err(e);
            }
        }
        params.process_parameters(request);

        debug!(
            path = request.path(),
            multipart,
            parameters = params.parameters.len(),
            files = params.files.len(),
            "parsed request parameters"
        );
        Ok(params)
    }

    async fn process_multipart(
        &mut self,
        request: &InboundRequest,
        config: &ParamsConfig,
        storage: &dyn UploadStorage,
    ) -> Result<(), ParamError> {
        let repository = storage
            .provision()
            .map_err(|e| ParamError::decoding(format!("failed to provision upload storage: {e}")))?;

        let mut multipart = Multipart::new(request.headers(), request.body().clone(), config)?;

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_owned) else {
                debug!("skipping multipart part without a field name");
                field.bytes().await?;
                continue;
            };

            match field.file_name().map(str::to_owned) {
                None => {
                    let value = field.text().await?;
                    self.parameters.insert(name, value);
                }
                Some(file_name) if file_name.is_empty() => {
                    field.bytes().await?;
                    debug!(field = %name, "dropping file part without a file name");
                }
                Some(file_name) => {
                    let mime_type = field.content_type().map(ToString::to_string);
                    let data = field.bytes().await?;
                    let file = UploadedFile::receive(
                        file_name,
                        mime_type,
                        data,
                        &repository,
                        config.size_threshold,
                    )
                    .await?;
                    if let Some(mut replaced) = self.files.insert(name, file) {
                        replaced.dispose();
                    }
                }
            }
        }

        Ok(())
    }

    fn process_parameters(&mut self, request: &InboundRequest) {
        for name in request.parameter_names() {
            if let Some(value) = request.parameter(name) {
                self.parameters.insert(name.to_owned(), value.to_owned());
            }
        }
    }

    // Raw access

    /// Returns the raw value of a parameter.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters.get(name).map(String::as_str)
    }

    /// Returns all parameter names in discovery order.
    pub fn parameter_names(&self) -> impl Iterator<Item = &str> {
        self.parameters.keys().map(String::as_str)
    }

    /// Returns `true` if a parameter with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.parameters.contains_key(name)
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    /// Returns `true` if the request carried no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Returns the date format used by [`get_as_date`](Self::get_as_date).
    #[must_use]
    pub fn date_format(&self) -> &DateFormat {
        &self.date_format
    }

    fn non_empty(&self, name: &str) -> Option<&str> {
        self.parameter(name).filter(|v| !v.is_empty())
    }

    // Typed accessors

    /// Reads a date parameter.
    ///
    /// Empty and absent values fail when `mandatory`, otherwise yield `None`.
    pub fn get_as_date(&self, name: &str, mandatory: bool) -> Result<Option<NaiveDateTime>, ParamError> {
        match self.non_empty(name) {
            Some(value) => self.date_format.parse(value).map(Some).map_err(|e| {
                ParamError::malformed(
                    name,
                    format!("invalid date format (expected '{}'): {e}", self.date_format),
                )
            }),
            None if mandatory => Err(ParamError::missing(name)),
            None => Ok(None),
        }
    }

    /// Reads an integer parameter within `[min, max]`.
    ///
    /// Empty and absent values fail when `mandatory`, otherwise yield `None`.
    /// A non-numeric value fails regardless of `mandatory`.
    pub fn get_as_int(&self, name: &str, min: i32, max: i32, mandatory: bool) -> Result<Option<i32>, ParamError> {
        match self.non_empty(name) {
            Some(value) => parse_int(name, value, min, max).map(Some),
            None if mandatory => Err(ParamError::missing(name)),
            None => Ok(None),
        }
    }

    /// Reads an integer parameter within `[min, max]`, substituting `default`
    /// when it is empty or absent.
    pub fn get_as_int_or(&self, name: &str, min: i32, max: i32, default: i32) -> Result<i32, ParamError> {
        self.get_as_int(name, min, max, false)
            .map(|value| value.unwrap_or(default))
    }

    /// Reads a string parameter whose length is within `[min_len, max_len]`.
    ///
    /// Length is counted in characters. An absent value fails when
    /// `mandatory`, otherwise yields `None`.
    pub fn get_as_string(
        &self,
        name: &str,
        min_len: usize,
        max_len: usize,
        mandatory: bool,
    ) -> Result<Option<String>, ParamError> {
        match self.parameter(name) {
            Some(value) => check_length(name, value, min_len, max_len).map(|()| Some(value.to_owned())),
            None if mandatory => Err(ParamError::missing(name)),
            None => Ok(None),
        }
    }

    /// Reads a string parameter, substituting `default` when absent.
    ///
    /// The length bounds apply to the substituted default as well.
    pub fn get_as_string_or(
        &self,
        name: &str,
        min_len: usize,
        max_len: usize,
        default: &str,
    ) -> Result<String, ParamError> {
        let value = self.parameter(name).unwrap_or(default);
        check_length(name, value, min_len, max_len)?;
        Ok(value.to_owned())
    }

    /// Reads a parameter as a member of the enumeration `T`.
    ///
    /// Members are matched by their serde name, so unit variants of any
    /// `#[derive(Deserialize)]` enum work out of the box.
    ///
    /// ```rust
    /// use hermes_params::{InboundRequest, ParamsConfig, RequestParams};
    /// use serde::Deserialize;
    ///
    /// #[derive(Debug, PartialEq, Deserialize)]
    /// #[serde(rename_all = "lowercase")]
    /// enum Order { Asc, Desc }
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() {
    /// let request = InboundRequest::builder()
    ///     .uri(http::Uri::from_static("/?order=desc"))
    ///     .build();
    /// let params = RequestParams::parse(&request, &ParamsConfig::default()).await.unwrap();
    ///
    /// assert_eq!(params.get_as_enum::<Order>("order", true).unwrap(), Some(Order::Desc));
    /// # }
    /// ```
    pub fn get_as_enum<T: DeserializeOwned>(&self, name: &str, mandatory: bool) -> Result<Option<T>, ParamError> {
        match self.non_empty(name) {
            Some(value) => parse_enum(value)
                .map(Some)
                .ok_or_else(|| ParamError::malformed_enum(name, std::any::type_name::<T>())),
            None if mandatory => Err(ParamError::missing(name)),
            None => Ok(None),
        }
    }

    /// Reads an enumeration member, substituting `default` when the value is
    /// empty, absent, or not a member of `T`.
    pub fn get_as_enum_or<T: DeserializeOwned>(&self, name: &str, default: T) -> T {
        match self.get_as_enum(name, false) {
            Ok(Some(value)) => value,
            Ok(None) => default,
            Err(e) => {
                debug!(parameter = name, error = %e, "using default for unknown enum member");
                default
            }
        }
    }

    /// Reads a boolean parameter.
    ///
    /// `true` only when the value equals `"true"` ignoring ASCII case; any
    /// other text is `false`. An absent value fails when `mandatory`,
    /// otherwise yields `false`.
    pub fn get_as_boolean(&self, name: &str, mandatory: bool) -> Result<bool, ParamError> {
        match self.parameter(name) {
            Some(value) => Ok(is_true(value)),
            None if mandatory => Err(ParamError::missing(name)),
            None => Ok(false),
        }
    }

    /// Reads a boolean parameter, substituting `default` when empty or absent.
    #[must_use]
    pub fn get_as_boolean_or(&self, name: &str, default: bool) -> bool {
        self.non_empty(name).map_or(default, is_true)
    }

    // Indexed lists

    fn indexed(&self, list_name: &str) -> Vec<(&str, &str)> {
        indexed::collect(
            self.parameters.iter().map(|(n, v)| (n.as_str(), v.as_str())),
            list_name,
        )
    }

    /// Reads the values of `list_name[0]`, `list_name[1]`, ... ordered by index.
    ///
    /// Gaps in the indices are skipped.
    #[must_use]
    pub fn get_as_list_of_strings(&self, list_name: &str) -> Vec<String> {
        self.indexed(list_name)
            .into_iter()
            .map(|(_, value)| value.to_owned())
            .collect()
    }

    /// Reads an indexed list of integers.
    ///
    /// # Errors
    ///
    /// Returns a malformed-value error naming the first non-numeric element.
    /// An empty element is non-numeric.
    pub fn get_as_list_of_ints(&self, list_name: &str) -> Result<Vec<i32>, ParamError> {
        self.indexed(list_name)
            .into_iter()
            .map(|(name, value)| {
                value.parse::<i32>().map_err(|_| {
                    ParamError::malformed(name, "value is not in valid numerical format")
                })
            })
            .collect()
    }

    /// Reads an indexed list of enumeration members. Empty elements are skipped.
    ///
    /// # Errors
    ///
    /// Returns a malformed-value error naming `list_name` and `T` if any
    /// element is not a member of `T`.
    pub fn get_as_enums<T: DeserializeOwned>(&self, list_name: &str) -> Result<Vec<T>, ParamError> {
        self.indexed(list_name)
            .into_iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(_, value)| {
                parse_enum(value)
                    .ok_or_else(|| ParamError::malformed_enum(list_name, std::any::type_name::<T>()))
            })
            .collect()
    }

    // Files

    /// Returns the file uploaded under `field`.
    #[must_use]
    pub fn file(&self, field: &str) -> Option<&UploadedFile> {
        self.files.get(field)
    }

    /// Returns all uploaded files with their field names.
    pub fn files(&self) -> impl Iterator<Item = (&str, &UploadedFile)> {
        self.files.iter().map(|(name, file)| (name.as_str(), file))
    }

    /// Returns the number of uploaded files.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Releases the storage of every uploaded file.
    ///
    /// Safe to call more than once; later calls do nothing.
    pub fn dispose(&mut self) {
        for file in self.files.values_mut() {
            file.dispose();
        }
    }
}

fn parse_int(name: &str, value: &str, min: i32, max: i32) -> Result<i32, ParamError> {
    let parsed: i32 = value
        .parse()
        .map_err(|_| ParamError::malformed(name, "value is not in valid numerical format"))?;

    if parsed < min || parsed > max {
        return Err(ParamError::out_of_bounds(
            name,
            format!("{parsed} is outside the range [{min}, {max}]"),
        ));
    }
    Ok(parsed)
}

fn check_length(name: &str, value: &str, min_len: usize, max_len: usize) -> Result<(), ParamError> {
    let len = value.chars().count();
    if len > max_len {
        return Err(ParamError::out_of_bounds(
            name,
            format!("too long (maximal length is {max_len})"),
        ));
    }
    if len < min_len {
        return Err(ParamError::out_of_bounds(
            name,
            format!("too short (minimal length is {min_len})"),
        ));
    }
    Ok(())
}

fn parse_enum<T: DeserializeOwned>(value: &str) -> Option<T> {
    let deserializer: StrDeserializer<'_, serde::de::value::Error> = value.into_deserializer();
    T::deserialize(deserializer).ok()
}

fn is_true(value: &str) -> bool {
    value.eq_ignore_ascii_case("true")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ParamErrorKind;
    use http::Uri;
    use proptest::prelude::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Deserialize)]
    enum Color {
        Red,
        Green,
        Blue,
    }

    async fn parse_query(query: &'static str) -> RequestParams {
        let request = InboundRequest::builder().uri(Uri::from_static(query)).build();
        RequestParams::parse(&request, &ParamsConfig::default())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_non_multipart_parameters() {
        let params = parse_query("/?a=1&b=x").await;

        assert_eq!(params.len(), 2);
        assert_eq!(params.parameter("a"), Some("1"));
        assert_eq!(params.parameter("b"), Some("x"));
        assert_eq!(params.file_count(), 0);
        assert_eq!(params.parameter_names().collect::<Vec<_>>(), ["a", "b"]);
    }

    #[tokio::test]
    async fn test_int_accessors() {
        let params = parse_query("/?count=42&bad=abc&empty=").await;

        assert_eq!(params.get_as_int("count", 0, 100, true).unwrap(), Some(42));
        assert_eq!(params.get_as_int("missing", 0, 100, false).unwrap(), None);
        assert_eq!(params.get_as_int("empty", 0, 100, false).unwrap(), None);
        assert_eq!(params.get_as_int_or("missing", 0, 100, 7).unwrap(), 7);
        assert_eq!(params.get_as_int_or("count", 0, 100, 7).unwrap(), 42);

        let missing = params.get_as_int("missing", 0, 100, true).unwrap_err();
        assert_eq!(missing.kind(), ParamErrorKind::Missing);

        for mandatory in [true, false] {
            let err = params.get_as_int("bad", 0, 100, mandatory).unwrap_err();
            assert_eq!(err.kind(), ParamErrorKind::Malformed);
            assert_eq!(err.parameter(), Some("bad"));
        }
        assert_eq!(
            params.get_as_int_or("bad", 0, 100, 7).unwrap_err().kind(),
            ParamErrorKind::Malformed
        );
    }

    #[tokio::test]
    async fn test_int_surrounding_whitespace_rejected() {
        let params = parse_query("/?lead=%205&trail=5%20").await;

        for name in ["lead", "trail"] {
            let err = params.get_as_int(name, 0, 100, false).unwrap_err();
            assert_eq!(err.kind(), ParamErrorKind::Malformed);
            assert_eq!(err.parameter(), Some(name));
        }
    }

    #[tokio::test]
    async fn test_int_bounds_enforced() {
        let params = parse_query("/?count=101&low=-1").await;

        let err = params.get_as_int("count", 0, 100, true).unwrap_err();
        assert_eq!(err.kind(), ParamErrorKind::OutOfBounds);
        assert!(err.to_string().contains("[0, 100]"));
        assert_eq!(
            params.get_as_int("low", 0, 100, false).unwrap_err().kind(),
            ParamErrorKind::OutOfBounds
        );
        assert_eq!(params.get_as_int_or("absent", 0, 100, 500).unwrap(), 500);
    }

    #[tokio::test]
    async fn test_string_length_bounds() {
        let params = parse_query("/?short=hi&long=this+is+too+long&ok=hello").await;

        let short = params.get_as_string("short", 3, 10, true).unwrap_err();
        assert_eq!(short.kind(), ParamErrorKind::OutOfBounds);
        assert!(short.to_string().contains("too short"));

        let long = params.get_as_string("long", 3, 10, true).unwrap_err();
        assert_eq!(long.kind(), ParamErrorKind::OutOfBounds);
        assert!(long.to_string().contains("too long"));

        assert_eq!(
            params.get_as_string("ok", 3, 10, true).unwrap(),
            Some("hello".to_string())
        );
    }

    #[tokio::test]
    async fn test_string_missing_and_default() {
        let params = parse_query("/?name=Al").await;

        assert_eq!(
            params.get_as_string("title", 0, 10, true).unwrap_err().kind(),
            ParamErrorKind::Missing
        );
        assert_eq!(params.get_as_string("title", 0, 10, false).unwrap(), None);
        assert_eq!(params.get_as_string_or("title", 0, 10, "none").unwrap(), "none");
        assert_eq!(params.get_as_string_or("name", 0, 10, "none").unwrap(), "Al");
        assert!(params.get_as_string_or("title", 5, 10, "none").is_err());
    }

    #[tokio::test]
    async fn test_string_length_counts_characters() {
        let params = parse_query("/?city=Z%C3%BCrich").await;

        assert_eq!(
            params.get_as_string("city", 6, 6, true).unwrap().as_deref(),
            Some("Zürich")
        );
    }

    #[tokio::test]
    async fn test_date_accessor() {
        let params = parse_query("/?at=2024-03-15T10:20:30&bad=15/03/2024").await;

        let at = params.get_as_date("at", true).unwrap().unwrap();
        assert_eq!(at.to_string(), "2024-03-15 10:20:30");

        let err = params.get_as_date("bad", false).unwrap_err();
        assert_eq!(err.kind(), ParamErrorKind::Malformed);
        assert_eq!(err.parameter(), Some("bad"));

        assert_eq!(params.get_as_date("absent", false).unwrap(), None);
        assert_eq!(
            params.get_as_date("absent", true).unwrap_err().kind(),
            ParamErrorKind::Missing
        );
    }

    #[tokio::test]
    async fn test_date_accessor_uses_configured_format() {
        let request = InboundRequest::builder()
            .uri(Uri::from_static("/?day=15/03/2024"))
            .build();
        let config = ParamsConfig::new().date_format(DateFormat::new("%d/%m/%Y"));
        let params = RequestParams::parse(&request, &config).await.unwrap();

        let day = params.get_as_date("day", true).unwrap().unwrap();
        assert_eq!(day.to_string(), "2024-03-15 00:00:00");
    }

    #[tokio::test]
    async fn test_enum_accessors() {
        let params = parse_query("/?color=Green&bad=Purple&empty=").await;

        assert_eq!(params.get_as_enum::<Color>("color", true).unwrap(), Some(Color::Green));
        assert_eq!(params.get_as_enum::<Color>("empty", false).unwrap(), None);
        assert_eq!(
            params.get_as_enum::<Color>("absent", true).unwrap_err().kind(),
            ParamErrorKind::Missing
        );

        let err = params.get_as_enum::<Color>("bad", false).unwrap_err();
        assert_eq!(err.kind(), ParamErrorKind::Malformed);
        assert_eq!(err.parameter(), Some("bad"));
        assert!(err.target_type().unwrap().ends_with("Color"));
    }

    #[tokio::test]
    async fn test_enum_with_default() {
        let params = parse_query("/?color=Blue&bad=Purple").await;

        assert_eq!(params.get_as_enum_or("color", Color::Red), Color::Blue);
        assert_eq!(params.get_as_enum_or("absent", Color::Red), Color::Red);
        assert_eq!(params.get_as_enum_or("bad", Color::Red), Color::Red);
    }

    #[tokio::test]
    async fn test_boolean_accessors() {
        let params = parse_query("/?a=true&b=TRUE&c=yes&d=1&e=").await;

        assert!(params.get_as_boolean("a", true).unwrap());
        assert!(params.get_as_boolean("b", false).unwrap());
        assert!(!params.get_as_boolean("c", false).unwrap());
        assert!(!params.get_as_boolean("d", false).unwrap());
        assert!(!params.get_as_boolean("e", true).unwrap());
        assert!(!params.get_as_boolean("absent", false).unwrap());
        assert_eq!(
            params.get_as_boolean("absent", true).unwrap_err().kind(),
            ParamErrorKind::Missing
        );

        assert!(params.get_as_boolean_or("absent", true));
        assert!(params.get_as_boolean_or("e", true));
        assert!(!params.get_as_boolean_or("c", true));
        assert!(params.get_as_boolean_or("b", false));
    }

    #[tokio::test]
    async fn test_list_of_strings_sorted_and_restartable() {
        let params = parse_query("/?tags[0]=red&tags[2]=blue&tags[1]=green&other=x").await;

        let first = params.get_as_list_of_strings("tags");
        assert_eq!(first, ["red", "green", "blue"]);
        assert_eq!(params.get_as_list_of_strings("tags"), first);
        assert!(params.get_as_list_of_strings("missing").is_empty());
    }

    #[tokio::test]
    async fn test_list_of_ints() {
        let params =
            parse_query("/?ids[1]=20&ids[0]=10&bad[0]=1&bad[1]=x&gap[0]=1&gap[1]=&pad[0]=%207")
                .await;

        assert_eq!(params.get_as_list_of_ints("ids").unwrap(), [10, 20]);

        let err = params.get_as_list_of_ints("bad").unwrap_err();
        assert_eq!(err.kind(), ParamErrorKind::Malformed);
        assert_eq!(err.parameter(), Some("bad[1]"));

        let err = params.get_as_list_of_ints("gap").unwrap_err();
        assert_eq!(err.kind(), ParamErrorKind::Malformed);
        assert_eq!(err.parameter(), Some("gap[1]"));

        let err = params.get_as_list_of_ints("pad").unwrap_err();
        assert_eq!(err.parameter(), Some("pad[0]"));
    }

    #[tokio::test]
    async fn test_list_of_enums() {
        let params = parse_query("/?c[1]=Blue&c[0]=Red&c[2]=&bad[0]=Red&bad[1]=Pink").await;

        assert_eq!(params.get_as_enums::<Color>("c").unwrap(), [Color::Red, Color::Blue]);

        let err = params.get_as_enums::<Color>("bad").unwrap_err();
        assert_eq!(err.parameter(), Some("bad"));
        assert!(err.target_type().unwrap().ends_with("Color"));
    }

    #[test]
    fn test_is_true() {
        assert!(is_true("true"));
        assert!(is_true("tRuE"));
        assert!(!is_true(" true"));
        assert!(!is_true(""));
    }

    proptest! {
        #[test]
        fn boolean_true_only_for_case_folded_true(value in "\\PC{0,8}") {
            prop_assert_eq!(is_true(&value), value.to_ascii_lowercase() == "true");
        }

        #[test]
        fn any_casing_of_true_is_true(mask in proptest::collection::vec(any::<bool>(), 4)) {
            let value: String = "true"
                .chars()
                .zip(mask)
                .map(|(c, upper)| if upper { c.to_ascii_uppercase() } else { c })
                .collect();
            prop_assert!(is_true(&value));
        }
    }
}
