/*!
Formatting and parsing of instants as strings.

The only format language offered is the `strftime`/`strptime` style specifier
set in [`strtime`], extended with a handful of specifiers for lossless
sub-second precision and unambiguous offsets. See that module for the
supported table and the extension semantics.
*/

pub mod strtime;
